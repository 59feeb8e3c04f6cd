use serde::{Deserialize, Serialize};

use crate::persistence::{load_json, KeyValueStore};

/// Storage key the settings themselves live under.
pub const SETTINGS_KEY: &str = "numberGuessingSettings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_users_key")]
    pub users_key: String,

    #[serde(default = "default_session_key")]
    pub session_key: String,

    #[serde(default = "default_leaderboard_key")]
    pub leaderboard_key: String,

    #[serde(default = "default_leaderboard_capacity")]
    pub leaderboard_capacity: usize,

    #[serde(default = "default_leaderboard_preview")]
    pub leaderboard_preview: usize,

    #[serde(default = "default_true")]
    pub seed_demo_account: bool,
}

fn default_users_key() -> String {
    "users".to_string()
}
fn default_session_key() -> String {
    "currentUser".to_string()
}
fn default_leaderboard_key() -> String {
    "numberGuessingLeaderboard".to_string()
}
fn default_leaderboard_capacity() -> usize {
    10
}
fn default_leaderboard_preview() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            users_key: default_users_key(),
            session_key: default_session_key(),
            leaderboard_key: default_leaderboard_key(),
            leaderboard_capacity: default_leaderboard_capacity(),
            leaderboard_preview: default_leaderboard_preview(),
            seed_demo_account: true,
        }
    }
}

impl Settings {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, SETTINGS_KEY) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("ignoring stored settings: {err}");
                Self::default()
            }
        }
    }
}
