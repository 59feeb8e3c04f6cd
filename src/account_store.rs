use std::rc::Rc;

use log::{debug, info, warn};

use crate::account::{Account, BestScore, PublicAccount};
use crate::clock::Clock;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::persistence::{load_json_or_default, save_json, KeyValueStore};

pub type ListenerId = usize;

type Listener = Box<dyn FnMut(Option<&PublicAccount>)>;

/// Registered accounts plus the single logged-in session.
///
/// Every mutation rewrites the whole account list and/or session record.
/// There is no locking: the last writer wins.
pub struct AccountStore {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    users_key: String,
    session_key: String,
    current: Option<PublicAccount>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl AccountStore {
    /// Open the store, seeding the demo account if enabled and restoring a saved session.
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        settings: &Settings,
    ) -> Result<Self> {
        let mut accounts = Self {
            store,
            clock,
            users_key: settings.users_key.clone(),
            session_key: settings.session_key.clone(),
            current: None,
            listeners: Vec::new(),
            next_listener_id: 0,
        };

        if settings.seed_demo_account && accounts.load_accounts().is_empty() {
            let demo = accounts.demo_account();
            save_json(accounts.store.as_ref(), &accounts.users_key, &[demo])?;
            info!("seeded demo account");
        }

        accounts.current = load_json_or_default(accounts.store.as_ref(), &accounts.session_key);
        if let Some(user) = &accounts.current {
            debug!("restored session for {}", user.email);
        }

        Ok(accounts)
    }

    pub fn current(&self) -> Option<&PublicAccount> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn accounts(&self) -> Vec<PublicAccount> {
        self.load_accounts().iter().map(PublicAccount::from).collect()
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<PublicAccount> {
        if [name, email, password].iter().any(|field| field.is_empty()) {
            return Err(Error::MissingFields);
        }

        let mut accounts = self.load_accounts();
        if accounts.iter().any(|account| account.email == email) {
            warn!("registration rejected, {email} already exists");
            return Err(Error::DuplicateEmail);
        }

        let created_at = self.clock.now();
        let account = Account {
            id: next_account_id(&accounts, created_at.timestamp_millis()),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Some(created_at),
            games_played: 0,
            best_score: None,
        };
        let public = PublicAccount::from(&account);

        let previous = accounts.clone();
        accounts.push(account);
        save_json(self.store.as_ref(), &self.users_key, &accounts)?;
        if let Err(err) = self.set_session(public.clone()) {
            if let Err(rollback) = save_json(self.store.as_ref(), &self.users_key, &previous) {
                warn!("failed to roll back account list: {rollback}");
            }
            return Err(err);
        }

        info!("registered account {} ({})", public.id, public.email);
        Ok(public)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<PublicAccount> {
        if email.is_empty() || password.is_empty() {
            return Err(Error::MissingFields);
        }

        let accounts = self.load_accounts();
        let Some(account) = accounts.iter().find(|account| account.matches(email, password)) else {
            warn!("login failed for {email}");
            return Err(Error::InvalidCredentials);
        };

        let public = PublicAccount::from(account);
        self.set_session(public.clone())?;

        info!("logged in {}", public.email);
        Ok(public)
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.store.remove(&self.session_key) {
            warn!("failed to clear persisted session: {err}");
        }
        self.apply_session(None);
        info!("logged out");
    }

    /// Record a won round against the logged-in account. No-op without a session.
    pub fn update_stats(&mut self, attempts: u32, difficulty: &str, date: &str) -> Result<()> {
        let Some(current_id) = self.current.as_ref().map(|user| user.id.clone()) else {
            return Ok(());
        };

        let mut accounts = self.load_accounts();
        let Some(account) = accounts.iter_mut().find(|account| account.id == current_id) else {
            warn!("session account {current_id} is no longer stored, stats dropped");
            return Ok(());
        };

        account.games_played += 1;
        let candidate = BestScore {
            attempts,
            difficulty: difficulty.to_string(),
            date: date.to_string(),
        };
        if candidate.improves_on(account.best_score.as_ref()) {
            debug!("new best score for {}: {attempts} attempts", account.email);
            account.best_score = Some(candidate);
        }
        let refreshed = PublicAccount::from(&*account);

        save_json(self.store.as_ref(), &self.users_key, &accounts)?;
        self.set_session(refreshed)
    }

    /// Register a callback fired with the new session after every session change.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(Option<&PublicAccount>) + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn load_accounts(&self) -> Vec<Account> {
        load_json_or_default(self.store.as_ref(), &self.users_key)
    }

    /// The in-memory session only changes once the write has landed.
    fn set_session(&mut self, user: PublicAccount) -> Result<()> {
        save_json(self.store.as_ref(), &self.session_key, &user)?;
        self.apply_session(Some(user));
        Ok(())
    }

    fn apply_session(&mut self, session: Option<PublicAccount>) {
        self.current = session;
        for (_, listener) in self.listeners.iter_mut() {
            listener(self.current.as_ref());
        }
    }

    fn demo_account(&self) -> Account {
        Account {
            id: "demo-user".to_string(),
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
            password: "demo123".to_string(),
            created_at: Some(self.clock.now()),
            games_played: 5,
            best_score: Some(BestScore {
                attempts: 3,
                difficulty: "Medium (1-100)".to_string(),
                date: self.clock.today(),
            }),
        }
    }
}

fn next_account_id(accounts: &[Account], millis: i64) -> String {
    let mut candidate = millis;
    while accounts.iter().any(|account| account.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
