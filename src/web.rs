use std::cell::RefCell;
use std::rc::Rc;

use log::{warn, LevelFilter};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::account_store::AccountStore;
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::console_log;
use crate::core::{GuessOutcome, Round, RoundStatus};
use crate::difficulty::Difficulty;
use crate::error::Error;
use crate::persistence::{BrowserStorage, KeyValueStore, MemoryStore};
use crate::random::platform_random;
use crate::session::GameSession;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

struct App {
    accounts: AccountStore,
    game: GameSession,
    settings: Settings,
}

pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init(LevelFilter::Info);

    let store: Rc<dyn KeyValueStore> = match BrowserStorage::local() {
        Some(storage) => Rc::new(storage),
        None => {
            warn!("local storage unavailable, progress will not persist");
            Rc::new(MemoryStore::new())
        }
    };
    let settings = Settings::load(store.as_ref());
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);

    let accounts = AccountStore::new(store.clone(), clock.clone(), &settings).map_err(to_js)?;
    let game = GameSession::new(store, clock, platform_random(), &settings, Difficulty::default());

    APP.with(|slot| {
        *slot.borrow_mut() = Some(App {
            accounts,
            game,
            settings,
        });
    });

    Ok(())
}

fn with_app_mut<F, R>(f: F) -> Result<R, JsValue>
where
    F: FnOnce(&mut App) -> Result<R, JsValue>,
{
    APP.with(|slot| {
        let mut borrow = slot.borrow_mut();
        let app = borrow
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Application state missing"))?;
        f(app)
    })
}

fn to_js(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoundView {
    difficulty: &'static str,
    label: String,
    min: i64,
    max: i64,
    attempts: u32,
    won: bool,
    can_change_difficulty: bool,
    prompt: String,
}

impl From<&Round> for RoundView {
    fn from(round: &Round) -> Self {
        let settings = round.settings();
        Self {
            difficulty: round.difficulty().as_str(),
            label: settings.label.clone(),
            min: settings.min,
            max: settings.max,
            attempts: round.attempts(),
            won: round.status() == RoundStatus::Won,
            can_change_difficulty: round.can_change_difficulty(),
            prompt: round.prompt(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GuessView {
    outcome: &'static str,
    message: String,
    round: RoundView,
}

#[wasm_bindgen]
pub fn register(name: &str, email: &str, password: &str) -> Result<String, JsValue> {
    with_app_mut(|app| {
        let user = app.accounts.register(name, email, password).map_err(to_js)?;
        to_json(&user)
    })
}

#[wasm_bindgen]
pub fn login(email: &str, password: &str) -> Result<String, JsValue> {
    with_app_mut(|app| {
        let user = app.accounts.login(email, password).map_err(to_js)?;
        to_json(&user)
    })
}

#[wasm_bindgen]
pub fn logout() -> Result<(), JsValue> {
    with_app_mut(|app| {
        app.accounts.logout();
        Ok(())
    })
}

#[wasm_bindgen(js_name = currentUser)]
pub fn current_user() -> Result<String, JsValue> {
    with_app_mut(|app| to_json(&app.accounts.current()))
}

#[wasm_bindgen]
pub fn accounts() -> Result<String, JsValue> {
    with_app_mut(|app| to_json(&app.accounts.accounts()))
}

#[wasm_bindgen(js_name = selectDifficulty)]
pub fn select_difficulty(value: &str) -> Result<bool, JsValue> {
    let difficulty: Difficulty = value
        .parse()
        .map_err(|err: crate::difficulty::UnknownDifficulty| JsValue::from_str(&err.to_string()))?;
    with_app_mut(|app| Ok(app.game.select_difficulty(difficulty)))
}

#[wasm_bindgen(js_name = newRound)]
pub fn new_round() -> Result<String, JsValue> {
    with_app_mut(|app| {
        app.game.new_round();
        to_json(&RoundView::from(app.game.round()))
    })
}

#[wasm_bindgen(js_name = submitGuess)]
pub fn submit_guess(raw: &str) -> Result<String, JsValue> {
    with_app_mut(|app| {
        let outcome = app
            .game
            .submit_guess(raw, &mut app.accounts)
            .map_err(to_js)?;
        let name = match outcome {
            GuessOutcome::TooLow => "tooLow",
            GuessOutcome::TooHigh => "tooHigh",
            GuessOutcome::Won { .. } => "won",
        };
        to_json(&GuessView {
            outcome: name,
            message: outcome.message(),
            round: RoundView::from(app.game.round()),
        })
    })
}

#[wasm_bindgen(js_name = roundState)]
pub fn round_state() -> Result<String, JsValue> {
    with_app_mut(|app| to_json(&RoundView::from(app.game.round())))
}

#[wasm_bindgen]
pub fn leaderboard() -> Result<String, JsValue> {
    with_app_mut(|app| {
        let preview = app.game.leaderboard().top(app.settings.leaderboard_preview);
        to_json(preview)
    })
}
