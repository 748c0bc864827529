//! Player session, configuration, and clock for Syndicate.
//!
//! This crate ties the rules (`syndicate-game`) to storage
//! (`syndicate-store`). A [`Session`] holds one player's login, cached
//! company, and live subscriptions, and exposes each game action as a
//! method returning a [`Notice`](syndicate_types::Notice).
//!
//! # Modules
//!
//! - [`session`] -- Login, navigation, optimistic actions with rollback
//! - [`auth`] -- Login-or-register and the saved session
//! - [`config`] -- `syndicate-config.yaml` loading and backend selection
//! - [`clock`] -- Wall clock and a manual clock for tests

pub mod auth;
pub mod clock;
pub mod config;
pub mod session;

// Re-export primary types for convenience.
pub use auth::{Credentials, LoginError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BackendKind, ConfigError, GameConfig, LoggingConfig, StorageConfig, SyndicateConfig};
pub use session::{Screen, Session, ViewUpdate};
