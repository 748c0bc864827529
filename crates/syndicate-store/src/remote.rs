//! Shared realtime store on a Redis-compatible server (`Dragonfly`, Redis).
//!
//! Every client connected to the same server sees the same collection, and
//! every write is pushed to all subscribers over pub/sub.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `companies` | Hash | `owner` -> company JSON |
//! | `companies:changed` | Pub/sub channel | Owner key of every write |
//!
//! [`RemoteStore::update_company`](crate::CompanyStore::update_company) is
//! an `HGET` followed by an `HSET`: two round trips with no server-side
//! transaction in between.

use std::collections::{BTreeMap, HashMap};

use fred::interfaces::EventInterface;
use fred::prelude::*;
use serde_json::Value;
use syndicate_types::{Company, normalize};

use crate::error::StoreError;
use crate::store::CompanyStore;
use crate::subscription::Subscription;

/// Hash holding one JSON document per owner.
pub const COMPANIES_HASH: &str = "companies";

/// Channel announcing the owner of every write.
pub const CHANGES_CHANNEL: &str = "companies:changed";

/// Connection handle to the shared company collection.
#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
}

impl core::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteStore").finish_non_exhaustive()
    }
}

impl RemoteStore {
    /// Connect to the server at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed.
    /// Returns [`StoreError::Redis`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config = Config::from_url(url)
            .map_err(|e| StoreError::Config(format!("Invalid Redis URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to remote store");
        Ok(Self { client })
    }

    /// Delete the whole collection.
    ///
    /// **WARNING:** This deletes every company. Only use for testing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the delete fails.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _: i64 = self.client.del(COMPANIES_HASH).await?;
        Ok(())
    }

    async fn fetch_one(&self, owner: &str) -> Result<Option<Company>, StoreError> {
        let raw: Option<String> = self.client.hget(COMPANIES_HASH, owner).await?;
        Ok(raw.and_then(|raw| normalize(Some(&parse_document(raw)), owner)))
    }

    async fn fetch_all(&self) -> Result<BTreeMap<String, Company>, StoreError> {
        let raw: HashMap<String, String> = self.client.hgetall(COMPANIES_HASH).await?;
        Ok(raw
            .into_iter()
            .filter_map(|(owner, json)| {
                normalize(Some(&parse_document(json)), &owner).map(|c| (owner, c))
            })
            .collect())
    }

    /// Open a dedicated pub/sub connection, hand the first read to
    /// `listener`, then re-read with `fetch` on every change message.
    async fn watch<T, Fetch, Fut, F>(
        &self,
        fetch: Fetch,
        mut listener: F,
    ) -> Result<Subscription, StoreError>
    where
        T: Send + 'static,
        Fetch: Fn(Self) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
        F: FnMut(T) + Send + 'static,
    {
        let subscriber = self.client.clone_new();
        subscriber.init().await?;
        let mut messages = subscriber.message_rx();
        subscriber.subscribe(CHANGES_CHANNEL).await?;

        listener(fetch(self.clone()).await?);

        let store = self.clone();
        Ok(Subscription::spawn(move |gate, mut stop| async move {
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    message = messages.recv() => {
                        if let Err(e) = message {
                            tracing::warn!("Change stream interrupted: {e}");
                            if matches!(e, tokio::sync::broadcast::error::RecvError::Closed) {
                                break;
                            }
                        }
                        match fetch(store.clone()).await {
                            Ok(value) => {
                                if !gate.deliver(&mut listener, value) {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!("Re-read after change failed: {e}"),
                        }
                    }
                }
            }
            if let Err(e) = subscriber.quit().await {
                tracing::debug!("Closing subscriber connection failed: {e}");
            }
        }))
    }
}

/// Stored documents are JSON; anything else is kept as a raw string so it
/// normalizes to the base company rather than disappearing.
fn parse_document(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

impl CompanyStore for RemoteStore {
    async fn set_company(&self, owner: &str, record: &Company) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        let _: i64 = self
            .client
            .hset(COMPANIES_HASH, HashMap::from([(owner.to_owned(), json)]))
            .await?;
        let receivers: i64 = self.client.publish(CHANGES_CHANNEL, owner).await?;
        tracing::debug!(owner, receivers, "Wrote company");
        Ok(())
    }

    async fn read_company(&self, owner: &str) -> Result<Option<Company>, StoreError> {
        self.fetch_one(owner).await
    }

    async fn read_companies(&self) -> Result<BTreeMap<String, Company>, StoreError> {
        self.fetch_all().await
    }

    async fn get_company<F>(&self, owner: &str, listener: F) -> Result<Subscription, StoreError>
    where
        F: FnMut(Option<Company>) + Send + 'static,
    {
        let owner = owner.to_owned();
        self.watch(
            move |store: Self| {
                let owner = owner.clone();
                async move { store.fetch_one(&owner).await }
            },
            listener,
        )
        .await
    }

    async fn subscribe_companies<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: FnMut(BTreeMap<String, Company>) + Send + 'static,
    {
        self.watch(
            |store: Self| async move { store.fetch_all().await },
            listener,
        )
        .await
    }

    async fn update_company<F>(&self, owner: &str, updater: F) -> Result<bool, StoreError>
    where
        F: FnOnce(Company) -> Company + Send,
    {
        let Some(current) = self.fetch_one(owner).await? else {
            tracing::debug!(owner, "Update skipped: no such company");
            return Ok(false);
        };
        let next = updater(current);
        self.set_company(owner, &next).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_document_normalizes_to_base() {
        let value = parse_document("not json".to_owned());
        assert_eq!(normalize(Some(&value), "x"), Some(Company::base("x")));
    }

    #[test]
    fn json_document_is_parsed() {
        let value = parse_document(r#"{"money":5}"#.to_owned());
        assert_eq!(normalize(Some(&value), "x").map(|c| c.money), Some(5));
    }
}
