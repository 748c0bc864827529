//! Single-machine key/value store shared between tab handles.
//!
//! A [`LocalStore`] is a handle ("tab") onto a string key/value map shared
//! by every handle created with [`LocalStore::open_tab`]. Companies live
//! as one JSON document under [`COMPANIES_KEY`]. Every write emits a
//! [`StorageEvent`] on a broadcast channel, which is how subscribers in
//! this tab and in every other tab learn about changes.
//!
//! The map can optionally be mirrored to a JSON file so state survives a
//! restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};
use syndicate_types::{Company, TabId, normalize, normalize_collection};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::error::StoreError;
use crate::store::CompanyStore;
use crate::subscription::Subscription;

/// Key holding the serialized company collection.
pub const COMPANIES_KEY: &str = "tno_companies";

/// Capacity of the change broadcast channel.
///
/// A subscriber that falls further behind than this receives
/// [`RecvError::Lagged`] and re-reads the current state.
const EVENT_CAPACITY: usize = 256;

/// Notification that `key` changed, emitted by the handle `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that was written or removed.
    pub key: String,
    /// The tab handle that made the change.
    pub origin: TabId,
}

struct Shared {
    entries: RwLock<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    path: Option<PathBuf>,
    file_lock: tokio::sync::Mutex<()>,
}

/// One tab's handle onto the shared local key/value store.
#[derive(Clone)]
pub struct LocalStore {
    shared: Arc<Shared>,
    tab: TabId,
}

impl core::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalStore")
            .field("tab", &self.tab)
            .field("path", &self.shared.path)
            .finish_non_exhaustive()
    }
}

impl LocalStore {
    /// Create an empty store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::from_entries(BTreeMap::new(), None)
    }

    /// Open a store mirrored to the JSON file at `path`.
    ///
    /// A missing file starts an empty store. A file that does not hold a
    /// JSON object of strings is an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read.
    /// Returns [`StoreError::Serialization`] if its contents are malformed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str::<BTreeMap<String, String>>(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), keys = entries.len(), "Opened local store");
        Ok(Self::from_entries(entries, Some(path)))
    }

    fn from_entries(entries: BTreeMap<String, String>, path: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                entries: RwLock::new(entries),
                events,
                path,
                file_lock: tokio::sync::Mutex::new(()),
            }),
            tab: TabId::new(),
        }
    }

    /// Open another tab onto the same storage.
    #[must_use]
    pub fn open_tab(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            tab: TabId::new(),
        }
    }

    /// This handle's tab id.
    pub const fn tab(&self) -> TabId {
        self.tab
    }

    /// Subscribe to raw change events from every tab.
    pub fn events(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.events.subscribe()
    }

    // =========================================================================
    // Raw key/value access
    // =========================================================================

    /// Read the string stored at `key`.
    pub fn get_item(&self, key: &str) -> Option<String> {
        self.shared
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store `value` at `key` and notify every tab.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if mirroring to disk fails. The in-memory
    /// write has already happened in that case.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut entries = self
                .shared
                .entries
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            entries.insert(key.to_owned(), value.to_owned());
        }
        self.notify(key);
        self.persist().await
    }

    /// Delete `key` and notify every tab.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if mirroring to disk fails.
    pub async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let removed = {
            let mut entries = self
                .shared
                .entries
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            entries.remove(key).is_some()
        };
        if !removed {
            return Ok(());
        }
        self.notify(key);
        self.persist().await
    }

    fn notify(&self, key: &str) {
        // No receivers is fine: nobody is subscribed yet.
        let _ = self.shared.events.send(StorageEvent {
            key: key.to_owned(),
            origin: self.tab,
        });
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = self.shared.path.as_ref() else {
            return Ok(());
        };
        let _guard = self.shared.file_lock.lock().await;
        let json = {
            let entries = self
                .shared
                .entries
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            serde_json::to_string(&*entries)?
        };
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    // =========================================================================
    // Company document
    // =========================================================================

    /// Parse the companies document. Anything that is not a JSON object
    /// reads as an empty collection.
    fn companies_document(&self) -> Map<String, Value> {
        let Some(raw) = self.get_item(COMPANIES_KEY) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => {
                tracing::warn!("Discarding unreadable companies document: {e}");
                Map::new()
            }
        }
    }

    fn company_now(&self, owner: &str) -> Option<Company> {
        normalize(self.companies_document().get(owner), owner)
    }

    fn companies_now(&self) -> BTreeMap<String, Company> {
        normalize_collection(&self.companies_document())
    }

    /// Spawn a delivery loop that calls `read` and hands the result to
    /// `listener` after every change to the companies document.
    fn watch<T, R, F>(&self, read: R, mut listener: F) -> Subscription
    where
        T: Send + 'static,
        R: Fn(&Self) -> T + Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let mut events = self.events();
        listener(read(self));

        let store = self.clone();
        Subscription::spawn(move |gate, mut stop| async move {
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    event = events.recv() => match event {
                        Ok(ev) if ev.key == COMPANIES_KEY => {
                            if !gate.deliver(&mut listener, read(&store)) {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(tab = %store.tab, "Subscriber lagged by {n} events, re-reading");
                            if !gate.deliver(&mut listener, read(&store)) {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}

impl CompanyStore for LocalStore {
    async fn set_company(&self, owner: &str, record: &Company) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)?;
        let document = {
            let mut entries = self
                .shared
                .entries
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let mut map = match entries
                .get(COMPANIES_KEY)
                .map(|raw| serde_json::from_str::<Value>(raw))
            {
                Some(Ok(Value::Object(map))) => map,
                _ => Map::new(),
            };
            map.insert(owner.to_owned(), value);
            let document = serde_json::to_string(&map)?;
            entries.insert(COMPANIES_KEY.to_owned(), document.clone());
            document
        };
        tracing::debug!(tab = %self.tab, owner, bytes = document.len(), "Wrote company");
        self.notify(COMPANIES_KEY);
        self.persist().await
    }

    async fn read_company(&self, owner: &str) -> Result<Option<Company>, StoreError> {
        Ok(self.company_now(owner))
    }

    async fn read_companies(&self) -> Result<BTreeMap<String, Company>, StoreError> {
        Ok(self.companies_now())
    }

    async fn get_company<F>(&self, owner: &str, listener: F) -> Result<Subscription, StoreError>
    where
        F: FnMut(Option<Company>) + Send + 'static,
    {
        let owner = owner.to_owned();
        Ok(self.watch(move |store: &Self| store.company_now(&owner), listener))
    }

    async fn subscribe_companies<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: FnMut(BTreeMap<String, Company>) + Send + 'static,
    {
        Ok(self.watch(Self::companies_now, listener))
    }

    async fn update_company<F>(&self, owner: &str, updater: F) -> Result<bool, StoreError>
    where
        F: FnOnce(Company) -> Company + Send,
    {
        let Some(current) = self.company_now(owner) else {
            tracing::debug!(owner, "Update skipped: no such company");
            return Ok(false);
        };
        let next = updater(current);
        // The write lands on a later turn, as with the remote round trip.
        tokio::task::yield_now().await;
        self.set_company(owner, &next).await?;
        Ok(true)
    }
}
