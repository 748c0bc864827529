//! The company storage capability and the backend selected at startup.
//!
//! Both backends keep a keyed collection `companies[owner] -> Company` and
//! push change notifications to subscribers. Records are normalized on
//! every read, so listeners and updaters only ever see complete companies.
//!
//! # Consistency
//!
//! [`CompanyStore::update_company`] is a plain read-then-write. Two
//! updaters racing on the same owner can both read the same "before"
//! value, and the later write silently discards the earlier one. This
//! lost-update behavior is part of the contract; callers must not rely on
//! read-modify-write atomicity.

use std::collections::BTreeMap;
use std::future::Future;

use syndicate_types::Company;

use crate::error::StoreError;
use crate::local::LocalStore;
use crate::remote::RemoteStore;
use crate::subscription::Subscription;

/// Read, write, read-modify-write, and subscribe over the company
/// collection.
pub trait CompanyStore: Clone + Send + Sync + 'static {
    /// Unconditionally store `record` under `owner` and notify subscribers.
    fn set_company(
        &self,
        owner: &str,
        record: &Company,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Read one company once.
    fn read_company(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Option<Company>, StoreError>> + Send;

    /// Read the whole collection once.
    fn read_companies(
        &self,
    ) -> impl Future<Output = Result<BTreeMap<String, Company>, StoreError>> + Send;

    /// Deliver the current value of `owner` to `listener` immediately, then
    /// again after every change to the collection.
    fn get_company<F>(
        &self,
        owner: &str,
        listener: F,
    ) -> impl Future<Output = Result<Subscription, StoreError>> + Send
    where
        F: FnMut(Option<Company>) + Send + 'static;

    /// Deliver the whole collection to `listener` immediately, then again
    /// after every change.
    fn subscribe_companies<F>(
        &self,
        listener: F,
    ) -> impl Future<Output = Result<Subscription, StoreError>> + Send
    where
        F: FnMut(BTreeMap<String, Company>) + Send + 'static;

    /// Read `owner`, apply `updater`, and write the result.
    ///
    /// Returns `Ok(false)` without writing when no record exists. Not
    /// atomic; see the module docs.
    fn update_company<F>(
        &self,
        owner: &str,
        updater: F,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send
    where
        F: FnOnce(Company) -> Company + Send;
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// The storage backend chosen once at startup from configuration.
#[derive(Clone)]
pub enum Backend {
    /// Single-machine key/value store shared by every tab handle.
    Local(LocalStore),
    /// Shared Redis-compatible server with pub/sub change pushes.
    Remote(RemoteStore),
}

impl Backend {
    /// Short name for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "remote",
        }
    }
}

impl core::fmt::Debug for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Backend").field(&self.kind()).finish()
    }
}

impl CompanyStore for Backend {
    async fn set_company(&self, owner: &str, record: &Company) -> Result<(), StoreError> {
        match self {
            Self::Local(s) => s.set_company(owner, record).await,
            Self::Remote(s) => s.set_company(owner, record).await,
        }
    }

    async fn read_company(&self, owner: &str) -> Result<Option<Company>, StoreError> {
        match self {
            Self::Local(s) => s.read_company(owner).await,
            Self::Remote(s) => s.read_company(owner).await,
        }
    }

    async fn read_companies(&self) -> Result<BTreeMap<String, Company>, StoreError> {
        match self {
            Self::Local(s) => s.read_companies().await,
            Self::Remote(s) => s.read_companies().await,
        }
    }

    async fn get_company<F>(&self, owner: &str, listener: F) -> Result<Subscription, StoreError>
    where
        F: FnMut(Option<Company>) + Send + 'static,
    {
        match self {
            Self::Local(s) => s.get_company(owner, listener).await,
            Self::Remote(s) => s.get_company(owner, listener).await,
        }
    }

    async fn subscribe_companies<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: FnMut(BTreeMap<String, Company>) + Send + 'static,
    {
        match self {
            Self::Local(s) => s.subscribe_companies(listener).await,
            Self::Remote(s) => s.subscribe_companies(listener).await,
        }
    }

    async fn update_company<F>(&self, owner: &str, updater: F) -> Result<bool, StoreError>
    where
        F: FnOnce(Company) -> Company + Send,
    {
        match self {
            Self::Local(s) => s.update_company(owner, updater).await,
            Self::Remote(s) => s.update_company(owner, updater).await,
        }
    }
}
