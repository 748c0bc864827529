//! Storage layer for Syndicate companies.
//!
//! Two interchangeable backends implement [`CompanyStore`]:
//!
//! ```text
//! Session
//!     |
//!     +-- Backend::Local  --> LocalStore  (shared key/value map, tab broadcast)
//!     |
//!     +-- Backend::Remote --> RemoteStore (Redis hash + pub/sub channel)
//! ```
//!
//! The backend is chosen once at startup. Reads always return normalized
//! companies; writes notify every subscriber; `update_company` is a
//! non-atomic read-then-write.
//!
//! # Modules
//!
//! - [`store`] -- The [`CompanyStore`] capability and the [`Backend`] enum
//! - [`local`] -- Single-machine store with multi-tab change events
//! - [`remote`] -- Redis/`Dragonfly` hash with pub/sub change pushes
//! - [`subscription`] -- Cancellation handles for change listeners
//! - [`error`] -- Shared error types

pub mod error;
pub mod local;
pub mod remote;
pub mod store;
pub mod subscription;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use local::{COMPANIES_KEY, LocalStore, StorageEvent};
pub use remote::RemoteStore;
pub use store::{Backend, CompanyStore};
pub use subscription::Subscription;
