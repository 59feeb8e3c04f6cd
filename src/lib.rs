pub mod account;
pub mod account_store;
pub mod clock;
pub mod config;
pub mod core;
pub mod difficulty;
pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod random;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod console_log;
#[cfg(target_arch = "wasm32")]
mod web;

pub use crate::account::{Account, BestScore, PublicAccount};
pub use crate::account_store::{AccountStore, ListenerId};
pub use crate::clock::{Clock, SystemClock};
pub use crate::config::Settings;
pub use crate::core::{GuessOutcome, Round, RoundStatus};
pub use crate::difficulty::{Difficulty, DifficultySettings};
pub use crate::error::{Error, Result, StorageError};
pub use crate::leaderboard::{Leaderboard, LeaderboardEntry};
pub use crate::persistence::{KeyValueStore, MemoryStore};
pub use crate::random::RandomSource;
pub use crate::session::GameSession;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    web::start()
}
