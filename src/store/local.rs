//! LocalStore — typed access to the quote collection, selected filter, and
//! last shown quote on top of the durable and session key-value stores.

use std::sync::Arc;

use tracing::{debug, warn};

use super::traits::KeyValueStore;
use crate::error::StorageError;
use crate::quotes::model::{CategoryFilter, Quote, seed_quotes};

/// Well-known storage keys.
pub mod keys {
    /// Durable: JSON array of quotes.
    pub const QUOTES: &str = "quotes";
    /// Durable: raw filter string.
    pub const SELECTED_CATEGORY: &str = "selectedCategory";
    /// Session: JSON quote.
    pub const LAST_QUOTE: &str = "lastQuote";
}

/// Durable + session storage pair.
#[derive(Clone)]
pub struct LocalStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl LocalStore {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Load the quote collection, falling back to the seed quotes when the
    /// stored value is missing, unreadable, or corrupt. Never fails.
    pub async fn load(&self) -> Vec<Quote> {
        match self.load_stored_opt().await {
            Ok(Some(quotes)) => quotes,
            Ok(None) => {
                debug!("No stored quotes, using seed quotes");
                seed_quotes()
            }
            Err(e) => {
                warn!(error = %e, "Stored quotes unusable, using seed quotes");
                seed_quotes()
            }
        }
    }

    /// Read the stored collection as-is. Missing means empty; corrupt is an
    /// error.
    pub async fn load_stored(&self) -> Result<Vec<Quote>, StorageError> {
        Ok(self.load_stored_opt().await?.unwrap_or_default())
    }

    async fn load_stored_opt(&self) -> Result<Option<Vec<Quote>>, StorageError> {
        let Some(raw) = self.durable.get(keys::QUOTES).await? else {
            return Ok(None);
        };
        serde_json::from_str::<Option<Vec<Quote>>>(&raw).map_err(|e| StorageError::Corrupt {
            key: keys::QUOTES.to_string(),
            reason: e.to_string(),
        })
    }

    /// Overwrite the stored collection.
    pub async fn save(&self, quotes: &[Quote]) -> Result<(), StorageError> {
        let json = serde_json::to_string(quotes)?;
        self.durable.set(keys::QUOTES, &json).await?;
        debug!(count = quotes.len(), "Quotes saved");
        Ok(())
    }

    /// Remember the most recently shown quote for this session.
    pub async fn record_last_shown(&self, quote: &Quote) -> Result<(), StorageError> {
        let json = serde_json::to_string(quote)?;
        self.session.set(keys::LAST_QUOTE, &json).await
    }

    /// The most recently shown quote in this session, if any.
    pub async fn last_shown(&self) -> Option<Quote> {
        let raw = self.session.get(keys::LAST_QUOTE).await.ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    /// Persist the selected filter.
    pub async fn record_filter(&self, filter: &CategoryFilter) -> Result<(), StorageError> {
        self.durable
            .set(keys::SELECTED_CATEGORY, filter.as_str())
            .await
    }

    /// The persisted filter; `All` when absent or unreadable.
    pub async fn load_filter(&self) -> CategoryFilter {
        match self.durable.get(keys::SELECTED_CATEGORY).await {
            Ok(Some(raw)) => CategoryFilter::parse(&raw),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!(error = %e, "Failed to read selected filter");
                CategoryFilter::All
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use tempfile::TempDir;

    async fn test_local() -> (LocalStore, Arc<FileStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let durable = Arc::new(FileStore::open(dir.path()).await.unwrap());
        let local = LocalStore::new(durable.clone(), Arc::new(MemoryStore::new()));
        (local, durable, dir)
    }

    #[tokio::test]
    async fn load_without_stored_value_returns_seeds() {
        let (local, _durable, _dir) = test_local().await;
        assert_eq!(local.load().await, seed_quotes());
    }

    #[tokio::test]
    async fn load_with_corrupt_value_returns_seeds() {
        let (local, durable, _dir) = test_local().await;
        durable.set(keys::QUOTES, "{not json").await.unwrap();
        assert_eq!(local.load().await, seed_quotes());
    }

    #[tokio::test]
    async fn load_with_json_null_returns_seeds() {
        let (local, durable, _dir) = test_local().await;
        durable.set(keys::QUOTES, "null").await.unwrap();
        assert_eq!(local.load().await, seed_quotes());
    }

    #[tokio::test]
    async fn save_then_load() {
        let (local, _durable, _dir) = test_local().await;
        let quotes = vec![Quote::new("x", "Y")];
        local.save(&quotes).await.unwrap();
        assert_eq!(local.load().await, quotes);
    }

    #[tokio::test]
    async fn stored_empty_collection_is_not_seeded() {
        let (local, _durable, _dir) = test_local().await;
        local.save(&[]).await.unwrap();
        assert!(local.load().await.is_empty());
    }

    #[tokio::test]
    async fn load_stored_distinguishes_missing_from_corrupt() {
        let (local, durable, _dir) = test_local().await;
        assert!(local.load_stored().await.unwrap().is_empty());

        durable.set(keys::QUOTES, "garbage").await.unwrap();
        assert!(matches!(
            local.load_stored().await,
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn last_shown_overwrites() {
        let (local, _durable, _dir) = test_local().await;
        assert!(local.last_shown().await.is_none());

        local.record_last_shown(&Quote::new("one", "A")).await.unwrap();
        local.record_last_shown(&Quote::new("two", "B")).await.unwrap();
        assert_eq!(local.last_shown().await, Some(Quote::new("two", "B")));
    }

    #[tokio::test]
    async fn filter_roundtrip_and_default() {
        let (local, durable, _dir) = test_local().await;
        assert_eq!(local.load_filter().await, CategoryFilter::All);

        local
            .record_filter(&CategoryFilter::parse("Humor"))
            .await
            .unwrap();
        assert_eq!(
            durable.get(keys::SELECTED_CATEGORY).await.unwrap().as_deref(),
            Some("Humor")
        );
        assert_eq!(
            local.load_filter().await,
            CategoryFilter::Category("Humor".into())
        );
    }
}
