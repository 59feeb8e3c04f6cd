use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifficultySettings {
    pub min: i64,
    pub max: i64,
    pub label: String,
}

impl DifficultySettings {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn settings(self) -> DifficultySettings {
        match self {
            Self::Easy => DifficultySettings {
                min: 1,
                max: 50,
                label: "Easy (1-50)".to_string(),
            },
            Self::Medium => DifficultySettings {
                min: 1,
                max: 100,
                label: "Medium (1-100)".to_string(),
            },
            Self::Hard => DifficultySettings {
                min: 1,
                max: 200,
                label: "Hard (1-200)".to_string(),
            },
        }
    }

    /// Value used in storage and by the difficulty selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(value.to_string())),
        }
    }
}
