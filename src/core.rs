use crate::difficulty::{Difficulty, DifficultySettings};
use crate::error::{Error, Result};
use crate::random::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Playing,
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    TooLow,
    TooHigh,
    Won { attempts: u32 },
}

impl GuessOutcome {
    pub fn message(self) -> String {
        match self {
            Self::TooLow => "\u{1F4C8} Too low! Try a higher number.".to_string(),
            Self::TooHigh => "\u{1F4C9} Too high! Try a lower number.".to_string(),
            Self::Won { attempts } => {
                format!("\u{1F389} Congratulations! You guessed it in {attempts} attempts!")
            }
        }
    }
}

/// One target number and the guesses made against it.
#[derive(Clone, Debug)]
pub struct Round {
    difficulty: Difficulty,
    settings: DifficultySettings,
    target: i64,
    attempts: u32,
    status: RoundStatus,
}

impl Round {
    pub fn new(difficulty: Difficulty, random: &mut dyn RandomSource) -> Self {
        let settings = difficulty.settings();
        let target = random.between(settings.min, settings.max);
        Self::with_target(difficulty, target)
    }

    pub(crate) fn with_target(difficulty: Difficulty, target: i64) -> Self {
        Self {
            difficulty,
            settings: difficulty.settings(),
            target,
            attempts: 0,
            status: RoundStatus::Playing,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> &DifficultySettings {
        &self.settings
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// Revealed only once the round is won.
    pub fn target(&self) -> Option<i64> {
        (self.status == RoundStatus::Won).then_some(self.target)
    }

    /// Difficulty is locked while a round has guesses in flight.
    pub fn can_change_difficulty(&self) -> bool {
        !(self.status == RoundStatus::Playing && self.attempts > 0)
    }

    pub fn prompt(&self) -> String {
        format!(
            "I'm thinking of a number between {} and {}. Can you guess it?",
            self.settings.min, self.settings.max
        )
    }

    /// Rejected input leaves the round untouched.
    pub fn guess(&mut self, raw: &str) -> Result<GuessOutcome> {
        if self.status == RoundStatus::Won {
            return Err(Error::RoundFinished);
        }

        let out_of_range = Error::OutOfRange {
            min: self.settings.min,
            max: self.settings.max,
        };
        let Some(value) = parse_guess(raw) else {
            return Err(out_of_range);
        };
        if !self.settings.contains(value) {
            return Err(out_of_range);
        }

        self.attempts += 1;

        let outcome = match value.cmp(&self.target) {
            std::cmp::Ordering::Less => GuessOutcome::TooLow,
            std::cmp::Ordering::Greater => GuessOutcome::TooHigh,
            std::cmp::Ordering::Equal => {
                self.status = RoundStatus::Won;
                GuessOutcome::Won {
                    attempts: self.attempts,
                }
            }
        };

        Ok(outcome)
    }
}

/// Leading integer of the trimmed input, so `"42abc"` reads as 42 and `"abc"` as nothing.
fn parse_guess(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(idx, ch)| !(ch.is_ascii_digit() || (*idx == 0 && (*ch == '-' || *ch == '+'))))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());

    trimmed[..digits_end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ScriptedRandom;

    #[test]
    fn target_comes_from_the_random_source_within_range() {
        for difficulty in Difficulty::ALL {
            let settings = difficulty.settings();
            let mut low = ScriptedRandom::default();
            let round = Round::new(difficulty, &mut low);
            assert_eq!(round.target, settings.min);

            let mut high = ScriptedRandom::new([settings.max]);
            let round = Round::new(difficulty, &mut high);
            assert_eq!(round.target, settings.max);
            assert_eq!(round.attempts(), 0);
            assert_eq!(round.status(), RoundStatus::Playing);
        }
    }

    #[test]
    fn medium_round_to_42() {
        let mut round = Round::with_target(Difficulty::Medium, 42);

        assert_eq!(round.guess("10").unwrap(), GuessOutcome::TooLow);
        assert_eq!(round.attempts(), 1);
        assert_eq!(round.guess("90").unwrap(), GuessOutcome::TooHigh);
        assert_eq!(round.attempts(), 2);
        assert_eq!(round.guess("42").unwrap(), GuessOutcome::Won { attempts: 3 });
        assert_eq!(round.status(), RoundStatus::Won);
        assert_eq!(round.target(), Some(42));
    }

    #[test]
    fn invalid_input_does_not_count_as_an_attempt() {
        let mut round = Round::with_target(Difficulty::Easy, 20);

        for raw in ["", "abc", "0", "51", "-4", "999"] {
            let err = round.guess(raw).unwrap_err();
            assert!(matches!(err, Error::OutOfRange { min: 1, max: 50 }), "{raw}");
        }
        assert_eq!(round.attempts(), 0);
        assert_eq!(round.status(), RoundStatus::Playing);
        assert_eq!(round.target(), None);
    }

    #[test]
    fn parsing_takes_the_leading_integer() {
        assert_eq!(parse_guess(" 42 "), Some(42));
        assert_eq!(parse_guess("42abc"), Some(42));
        assert_eq!(parse_guess("12.9"), Some(12));
        assert_eq!(parse_guess("+7"), Some(7));
        assert_eq!(parse_guess("x1"), None);
        assert_eq!(parse_guess("-"), None);
    }

    #[test]
    fn classification_depends_only_on_state_and_input() {
        let original = Round::with_target(Difficulty::Hard, 150);
        for raw in ["1", "150", "200", "201", "nope"] {
            let first = original.clone().guess(raw).map_err(|e| e.to_string());
            let second = original.clone().guess(raw).map_err(|e| e.to_string());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn won_round_is_frozen() {
        let mut round = Round::with_target(Difficulty::Easy, 5);
        round.guess("5").unwrap();

        assert!(matches!(round.guess("5"), Err(Error::RoundFinished)));
        assert_eq!(round.attempts(), 1);
    }

    #[test]
    fn difficulty_lock_follows_attempts_and_status() {
        let mut round = Round::with_target(Difficulty::Easy, 5);
        assert!(round.can_change_difficulty());

        round.guess("1").unwrap();
        assert!(!round.can_change_difficulty());

        round.guess("5").unwrap();
        assert!(round.can_change_difficulty());
    }

    #[test]
    fn messages_match_the_game_copy() {
        let round = Round::with_target(Difficulty::Hard, 1);
        assert_eq!(
            round.prompt(),
            "I'm thinking of a number between 1 and 200. Can you guess it?"
        );
        assert!(GuessOutcome::Won { attempts: 4 }.message().contains("in 4 attempts"));
        assert_eq!(
            Error::OutOfRange { min: 1, max: 200 }.to_string(),
            "Please enter a valid number between 1 and 200"
        );
    }
}
