//! The player session: who is logged in, what they can see, and the
//! actions they take.
//!
//! A [`Session`] owns all per-player state: the current user, the cached
//! own company and collection snapshot, and the subscription handles that
//! keep both fresh.
//!
//! # Lifecycle
//!
//! ```text
//! Login --login()/restore()--> Home --enter_game()--> Game
//!   ^                           ^  <----go_home()----'
//!   '-----------logout()--------'--------------------'
//! ```
//!
//! Subscriptions run only while in [`Screen::Game`].
//!
//! # Actions
//!
//! Every action is applied to the cached company first, then persisted.
//! If the persist fails, the cache is rolled back to its pre-action value
//! and the failure is reported as an `err` notice. Successful heists and
//! sabotage additionally run a read-modify-write against the victim's
//! stored record; that write and the attacker's own write are independent.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use syndicate_game::{Action, LeaderboardEntry, Transition, apply_action, leaderboard};
use syndicate_store::{CompanyStore, StoreError, Subscription};
use syndicate_types::{Company, Notice};
use tokio::sync::broadcast;

use crate::auth::Credentials;
use crate::clock::{Clock, SystemClock};
use crate::config::GameConfig;

/// Capacity of the view update channel.
const VIEW_CAPACITY: usize = 64;

const NOT_LOGGED_IN: &str = "Log in first.";
const NOT_IN_GAME: &str = "Enter the game first.";

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Nobody is logged in.
    Login,
    /// Logged in, not subscribed to the game.
    Home,
    /// Logged in and receiving live updates.
    Game,
}

/// Fresh data for the presentation layer to re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// The player's own company changed (or does not exist yet).
    Company(Option<Company>),
    /// The collection snapshot changed.
    Companies(BTreeMap<String, Company>),
}

#[derive(Debug, Default)]
struct Cache {
    company: Option<Company>,
    companies: BTreeMap<String, Company>,
}

fn lock(cache: &Mutex<Cache>) -> MutexGuard<'_, Cache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One player's session against a company store.
pub struct Session<S, C = SystemClock> {
    store: S,
    credentials: Credentials,
    clock: C,
    rng: StdRng,
    user: Option<String>,
    screen: Screen,
    cache: Arc<Mutex<Cache>>,
    subscriptions: Vec<Subscription>,
    views: broadcast::Sender<ViewUpdate>,
}

impl<S, C> core::fmt::Debug for Session<S, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("screen", &self.screen)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl<S: CompanyStore, C: Clock> Session<S, C> {
    /// Create a logged-out session.
    pub fn new(store: S, credentials: Credentials, clock: C, game: GameConfig) -> Self {
        let rng = game
            .rng_seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let (views, _) = broadcast::channel(VIEW_CAPACITY);
        Self {
            store,
            credentials,
            clock,
            rng,
            user: None,
            screen: Screen::Login,
            cache: Arc::new(Mutex::new(Cache::default())),
            subscriptions: Vec::new(),
            views,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The logged-in user.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The current screen.
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// The cached own company.
    pub fn company(&self) -> Option<Company> {
        lock(&self.cache).company.clone()
    }

    /// The cached collection snapshot.
    pub fn companies(&self) -> BTreeMap<String, Company> {
        lock(&self.cache).companies.clone()
    }

    /// Leaderboard over the snapshot, with the player's row marked.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        leaderboard(&lock(&self.cache).companies, self.user.as_deref())
    }

    /// Owners the player may target: everyone in the snapshot but themself.
    pub fn targets(&self) -> Vec<String> {
        let cache = lock(&self.cache);
        cache
            .companies
            .keys()
            .filter(|owner| Some(owner.as_str()) != self.user.as_deref())
            .cloned()
            .collect()
    }

    /// Subscribe to re-render notifications.
    pub fn views(&self) -> broadcast::Receiver<ViewUpdate> {
        self.views.subscribe()
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Login / navigation
    // =========================================================================

    /// Resume a saved login. Returns whether one was found.
    pub fn restore(&mut self) -> bool {
        let Some(user) = self.credentials.saved_session() else {
            return false;
        };
        tracing::info!(user, "Restored saved session");
        self.user = Some(user);
        self.go_home();
        true
    }

    /// Log in, registering the name on first use.
    pub async fn login(&mut self, name: &str, password: &str) -> Notice {
        match self.credentials.login_or_register(name, password).await {
            Ok(user) => {
                tracing::info!(user, "Logged in");
                let notice = Notice::ok(format!("Welcome, {user}."));
                self.stop_subscriptions();
                self.clear_cache();
                self.user = Some(user);
                self.go_home();
                notice
            }
            Err(e) => Notice::err(e.to_string()),
        }
    }

    /// Log out and forget the saved session.
    pub async fn logout(&mut self) -> Notice {
        self.stop_subscriptions();
        if let Err(e) = self.credentials.forget_session().await {
            tracing::warn!("Failed to clear saved session: {e}");
        }
        if let Some(user) = self.user.take() {
            tracing::info!(user, "Logged out");
        }
        self.clear_cache();
        self.screen = Screen::Login;
        Notice::ok("Logged out.")
    }

    /// Leave the game view. Stops live updates.
    pub fn go_home(&mut self) {
        self.stop_subscriptions();
        if self.user.is_some() {
            self.screen = Screen::Home;
        }
    }

    /// Enter the game view and start live updates of the collection and
    /// the player's own company.
    pub async fn enter_game(&mut self) -> Notice {
        let Some(user) = self.user.clone() else {
            return Notice::err(NOT_LOGGED_IN);
        };
        self.stop_subscriptions();

        match self.start_subscriptions(&user).await {
            Ok(subs) => {
                self.subscriptions = subs;
                self.screen = Screen::Game;
                tracing::info!(user, "Entered game");
                match self.company() {
                    Some(_) => Notice::ok("Entered the game."),
                    None => Notice::ok("Entered the game. Create your company to start."),
                }
            }
            Err(e) => {
                tracing::warn!(user, "Failed to subscribe: {e}");
                Notice::err(format!("Could not reach storage: {e}"))
            }
        }
    }

    async fn start_subscriptions(&self, user: &str) -> Result<Vec<Subscription>, StoreError> {
        let cache = Arc::clone(&self.cache);
        let views = self.views.clone();
        let all = self
            .store
            .subscribe_companies(move |companies: BTreeMap<String, Company>| {
                lock(&cache).companies.clone_from(&companies);
                // No receivers is fine: nothing is rendering.
                let _ = views.send(ViewUpdate::Companies(companies));
            })
            .await?;

        let cache = Arc::clone(&self.cache);
        let views = self.views.clone();
        let own = self
            .store
            .get_company(user, move |company: Option<Company>| {
                lock(&cache).company.clone_from(&company);
                let _ = views.send(ViewUpdate::Company(company));
            })
            .await?;

        Ok(vec![all, own])
    }

    fn stop_subscriptions(&mut self) {
        for sub in self.subscriptions.drain(..) {
            sub.cancel();
        }
    }

    fn clear_cache(&self) {
        let mut cache = lock(&self.cache);
        cache.company = None;
        cache.companies.clear();
    }

    // =========================================================================
    // Company
    // =========================================================================

    /// Create the player's company, or rename it and change its password.
    ///
    /// Existing stats are kept; a new company starts from the defaults.
    pub async fn save_company(&mut self, name: &str, password: &str) -> Notice {
        let Some(owner) = self.user.clone() else {
            return Notice::err(NOT_LOGGED_IN);
        };
        if self.screen != Screen::Game {
            return Notice::err(NOT_IN_GAME);
        }
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Notice::err("Enter company name and password.");
        }

        let before = self.company();
        let mut company = before.clone().unwrap_or_else(|| Company::base(&owner));
        company.owner.clone_from(&owner);
        name.clone_into(&mut company.name);
        password.clone_into(&mut company.password);

        self.replace_company(Some(company.clone()));
        match self.store.set_company(&owner, &company).await {
            Ok(()) => {
                tracing::info!(owner, name, "Company saved");
                Notice::ok("Company saved.")
            }
            Err(e) => self.roll_back(&company, before, &e),
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Apply `action` to the player's company and persist the result.
    pub async fn perform(&mut self, action: Action) -> Notice {
        let Some(owner) = self.user.clone() else {
            return Notice::err(NOT_LOGGED_IN);
        };
        if self.screen != Screen::Game {
            return Notice::err(NOT_IN_GAME);
        }

        let now = self.clock.now_ms();
        let (before, companies) = {
            let cache = lock(&self.cache);
            (cache.company.clone(), cache.companies.clone())
        };
        let Transition {
            company,
            notice,
            levels_reached,
            target_effect,
        } = match apply_action(before.as_ref(), &action, now, &companies, &mut self.rng) {
            Ok(t) => t,
            Err(rejection) => return Notice::err(rejection.to_string()),
        };

        self.replace_company(Some(company.clone()));

        if let Some(effect) = target_effect {
            match self
                .store
                .update_company(&effect.owner, |victim| effect.apply(victim, now))
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(target = %effect.owner, "Target vanished before the theft landed");
                }
                Err(e) => {
                    tracing::warn!(target = %effect.owner, "Failed to debit target: {e}");
                }
            }
        }

        if let Err(e) = self.store.set_company(&owner, &company).await {
            return self.roll_back(&company, before, &e);
        }
        for level in levels_reached {
            tracing::info!(owner, level, "Level up");
        }
        notice
    }

    /// Claim the daily bonus.
    pub async fn claim_daily(&mut self) -> Notice {
        self.perform(Action::ClaimDaily).await
    }

    /// Collect income.
    pub async fn collect_income(&mut self) -> Notice {
        self.perform(Action::CollectIncome).await
    }

    /// Hire a guard.
    pub async fn hire_guard(&mut self) -> Notice {
        self.perform(Action::HireGuard).await
    }

    /// Train an operative.
    pub async fn train_operative(&mut self) -> Notice {
        self.perform(Action::TrainOperative).await
    }

    /// Run a mission.
    pub async fn run_mission(&mut self) -> Notice {
        self.perform(Action::RunMission).await
    }

    /// Upgrade security.
    pub async fn upgrade_security(&mut self) -> Notice {
        self.perform(Action::UpgradeSecurity).await
    }

    /// Lay low to shed heat.
    pub async fn lay_low(&mut self) -> Notice {
        self.perform(Action::LayLow).await
    }

    /// Attempt a heist on `target`.
    pub async fn heist(&mut self, target: &str) -> Notice {
        self.perform(Action::Heist {
            target: target.to_owned(),
        })
        .await
    }

    /// Spy on `target`.
    pub async fn spy(&mut self, target: &str) -> Notice {
        self.perform(Action::Spy {
            target: target.to_owned(),
        })
        .await
    }

    /// Attempt sabotage on `target` by guessing its company password.
    pub async fn sabotage(&mut self, target: &str, guess: &str) -> Notice {
        self.perform(Action::Sabotage {
            target: target.to_owned(),
            guess: guess.to_owned(),
        })
        .await
    }

    // =========================================================================
    // Cache
    // =========================================================================

    fn replace_company(&self, company: Option<Company>) {
        lock(&self.cache).company.clone_from(&company);
        let _ = self.views.send(ViewUpdate::Company(company));
    }

    /// Undo an optimistic update, unless a newer delivery already
    /// replaced it.
    fn roll_back(&self, optimistic: &Company, before: Option<Company>, error: &StoreError) -> Notice {
        tracing::warn!(owner = %optimistic.owner, "Persist failed, rolling back: {error}");
        let restored = {
            let mut cache = lock(&self.cache);
            if cache.company.as_ref() == Some(optimistic) {
                cache.company.clone_from(&before);
                true
            } else {
                false
            }
        };
        if restored {
            let _ = self.views.send(ViewUpdate::Company(before));
        }
        Notice::err(format!("Could not save: {error}"))
    }
}
