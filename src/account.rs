use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fewest-attempts win recorded for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestScore {
    pub attempts: u32,
    pub difficulty: String,
    pub date: String,
}

impl BestScore {
    /// Only a strictly lower attempt count replaces an existing best.
    pub fn improves_on(&self, current: Option<&BestScore>) -> bool {
        current.map_or(true, |best| self.attempts < best.attempts)
    }
}

/// Stored account record, password included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub best_score: Option<BestScore>,
}

impl Account {
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

/// Account as handed to callers and kept in the session: no password field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub best_score: Option<BestScore>,
}

impl PublicAccount {
    pub fn first_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }

    pub fn last_name(&self) -> &str {
        self.name.split_once(' ').map(|(_, rest)| rest).unwrap_or_default()
    }
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
            games_played: account.games_played,
            best_score: account.best_score.clone(),
        }
    }
}
