use std::rc::Rc;

use log::{debug, info, warn};

use crate::account_store::AccountStore;
use crate::clock::Clock;
use crate::config::Settings;
use crate::core::{GuessOutcome, Round};
use crate::difficulty::Difficulty;
use crate::error::Result;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::persistence::{load_json_or_default, save_json, KeyValueStore};
use crate::random::RandomSource;

/// The round in progress and the persisted leaderboard.
pub struct GameSession {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    random: Box<dyn RandomSource>,
    leaderboard_key: String,
    leaderboard: Leaderboard,
    round: Round,
}

impl GameSession {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        mut random: Box<dyn RandomSource>,
        settings: &Settings,
        difficulty: Difficulty,
    ) -> Self {
        let entries: Vec<LeaderboardEntry> =
            load_json_or_default(store.as_ref(), &settings.leaderboard_key);
        let leaderboard = Leaderboard::from_entries(entries, settings.leaderboard_capacity);
        let round = Round::new(difficulty, random.as_mut());

        Self {
            store,
            clock,
            random,
            leaderboard_key: settings.leaderboard_key.clone(),
            leaderboard,
            round,
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn start_round(&mut self, difficulty: Difficulty) {
        self.round = Round::new(difficulty, self.random.as_mut());
        debug!("started {} round", difficulty);
    }

    pub fn new_round(&mut self) {
        self.start_round(self.round.difficulty());
    }

    pub fn can_change_difficulty(&self) -> bool {
        self.round.can_change_difficulty()
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !self.can_change_difficulty() {
            debug!("difficulty change to {difficulty} refused mid-round");
            return false;
        }

        self.start_round(difficulty);
        true
    }

    /// Score a guess. A win is added to the leaderboard and reported to `accounts`.
    pub fn submit_guess(&mut self, raw: &str, accounts: &mut AccountStore) -> Result<GuessOutcome> {
        let outcome = self.round.guess(raw)?;

        if let GuessOutcome::Won { attempts } = outcome {
            let label = self.round.settings().label.clone();
            let date = self.clock.today();
            let entry = LeaderboardEntry {
                attempts,
                difficulty: label.clone(),
                date: date.clone(),
                timestamp: self.clock.now().timestamp_millis(),
                player_name: accounts.current().map(|user| user.name.clone()),
            };
            info!("round won in {attempts} attempts on {label}");

            self.leaderboard.record(entry);
            let entries = self.leaderboard.entries();
            if let Err(err) = save_json(self.store.as_ref(), &self.leaderboard_key, entries) {
                warn!("failed to persist leaderboard: {err}");
            }
            if let Err(err) = accounts.update_stats(attempts, &label, &date) {
                warn!("failed to persist account stats: {err}");
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::core::RoundStatus;
    use crate::error::Error;
    use crate::persistence::load_json;
    use crate::tests::{FailingStore, FixedClock, ScriptedRandom, UsingLogger};

    struct Fixture {
        store: Rc<FailingStore>,
        accounts: AccountStore,
        settings: Settings,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Rc::new(FailingStore::default());
            let settings = Settings {
                seed_demo_account: false,
                ..Settings::default()
            };
            let clock = Rc::new(FixedClock::default());
            let accounts = AccountStore::new(store.clone(), clock, &settings).unwrap();
            Self {
                store,
                accounts,
                settings,
            }
        }

        fn game(
            &self,
            difficulty: Difficulty,
            targets: impl IntoIterator<Item = i64>,
        ) -> GameSession {
            GameSession::new(
                self.store.clone(),
                Rc::new(FixedClock::default()),
                Box::new(ScriptedRandom::new(targets)),
                &self.settings,
                difficulty,
            )
        }

        fn stored_leaderboard(&self) -> Vec<LeaderboardEntry> {
            load_json(self.store.as_ref(), "numberGuessingLeaderboard")
                .unwrap()
                .unwrap_or_default()
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn medium_round_scenario(_: &mut UsingLogger) {
        let mut fx = Fixture::new();
        fx.accounts.register("Alice", "alice@example.com", "pw").unwrap();
        let mut game = fx.game(Difficulty::Medium, [42]);

        assert_eq!(game.submit_guess("10", &mut fx.accounts).unwrap(), GuessOutcome::TooLow);
        assert_eq!(game.round().attempts(), 1);
        assert_eq!(game.submit_guess("90", &mut fx.accounts).unwrap(), GuessOutcome::TooHigh);
        assert_eq!(game.round().attempts(), 2);
        assert_eq!(
            game.submit_guess("42", &mut fx.accounts).unwrap(),
            GuessOutcome::Won { attempts: 3 }
        );
        assert_eq!(game.round().status(), RoundStatus::Won);

        let entry = &game.leaderboard().entries()[0];
        assert_eq!(entry.attempts, 3);
        assert_eq!(entry.difficulty, "Medium (1-100)");
        assert_eq!(entry.date, FixedClock::default().today);
        assert_eq!(entry.player_name.as_deref(), Some("Alice"));
        assert_eq!(fx.stored_leaderboard(), game.leaderboard().entries());

        let alice = fx.accounts.current().unwrap();
        assert_eq!(alice.games_played, 1);
        assert_eq!(alice.best_score.as_ref().map(|b| b.attempts), Some(3));
    }

    #[test]
    fn out_of_range_guess_keeps_round_state() {
        let mut fx = Fixture::new();
        let mut game = fx.game(Difficulty::Easy, [25]);

        let err = game.submit_guess("75", &mut fx.accounts).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { min: 1, max: 50 }));
        assert_eq!(game.round().attempts(), 0);
        assert!(game.can_change_difficulty());
    }

    #[test]
    fn guest_wins_are_ranked_without_touching_accounts() {
        let mut fx = Fixture::new();
        let mut game = fx.game(Difficulty::Hard, [7]);

        game.submit_guess("7", &mut fx.accounts).unwrap();

        assert_eq!(game.leaderboard().entries()[0].player_name, None);
        assert!(fx.accounts.accounts().is_empty());
        assert!(fx.accounts.current().is_none());
    }

    #[test]
    fn difficulty_locks_after_first_guess_until_won() {
        let mut fx = Fixture::new();
        let mut game = fx.game(Difficulty::Medium, [50, 3, 9]);

        assert!(game.select_difficulty(Difficulty::Easy));
        assert_eq!(game.round().settings().max, 50);

        game.submit_guess("1", &mut fx.accounts).unwrap();
        assert!(!game.select_difficulty(Difficulty::Hard));
        assert_eq!(game.round().difficulty(), Difficulty::Easy);
        assert_eq!(game.round().attempts(), 1);

        game.submit_guess("3", &mut fx.accounts).unwrap();
        assert!(game.select_difficulty(Difficulty::Hard));
        assert_eq!(game.round().attempts(), 0);
        assert_eq!(game.round().status(), RoundStatus::Playing);
    }

    #[test]
    fn new_round_keeps_difficulty_and_resets() {
        let mut fx = Fixture::new();
        let mut game = fx.game(Difficulty::Easy, [4, 8]);

        game.submit_guess("4", &mut fx.accounts).unwrap();
        game.new_round();

        assert_eq!(game.round().difficulty(), Difficulty::Easy);
        assert_eq!(game.round().attempts(), 0);
        assert_eq!(
            game.submit_guess("8", &mut fx.accounts).unwrap(),
            GuessOutcome::Won { attempts: 1 }
        );
    }

    #[test]
    fn leaderboard_survives_reload_and_stays_capped() {
        let mut fx = Fixture::new();
        let mut game = fx.game(Difficulty::Easy, (1..=12).collect::<Vec<_>>());

        for round in 0..12u32 {
            let target = i64::from(round) + 1;
            for miss in 1..target.min(1 + round as i64 % 3) {
                let _ = game.submit_guess(&miss.to_string(), &mut fx.accounts);
            }
            game.submit_guess(&target.to_string(), &mut fx.accounts).unwrap();
            game.new_round();
        }

        let reloaded = fx.game(Difficulty::Easy, [1]);
        let stored = reloaded.leaderboard().entries();
        assert_eq!(stored.len(), 10);
        assert!(stored.windows(2).all(|pair| pair[0].attempts <= pair[1].attempts));
        assert_eq!(stored, game.leaderboard().entries());
    }

    #[test]
    fn malformed_leaderboard_starts_empty() {
        let fx = Fixture::new();
        fx.store.set("numberGuessingLeaderboard", "oops").unwrap();

        let game = fx.game(Difficulty::Medium, [1]);
        assert!(game.leaderboard().is_empty());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn win_is_reported_even_when_nothing_can_be_saved(_: &mut UsingLogger) {
        let mut fx = Fixture::new();
        fx.accounts.register("Kai", "kai@example.com", "pw").unwrap();
        let mut game = fx.game(Difficulty::Easy, [12]);

        fx.store.fail_writes_to("numberGuessingLeaderboard");
        fx.store.fail_writes_to("users");
        let outcome = game.submit_guess("12", &mut fx.accounts).unwrap();

        assert_eq!(outcome, GuessOutcome::Won { attempts: 1 });
        assert_eq!(game.round().status(), RoundStatus::Won);
        assert_eq!(game.leaderboard().len(), 1);
        assert!(fx.stored_leaderboard().is_empty());
        assert_eq!(fx.accounts.current().map(|u| u.games_played), Some(0));
    }
}
