//! QuoteBook — owns the in-memory quote collection and keeps it mirrored
//! into the durable store.
//!
//! Every mutation holds the collection's write lock across the durable write,
//! so the in-memory sequence and the stored value never diverge and a remote
//! merge cannot interleave with a local add or import.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info};

use super::model::{CategoryFilter, FilterView, Quote, categories};
use crate::error::{Result, StorageError, ValidationError};
use crate::remote::QuoteRemote;
use crate::store::LocalStore;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Collection change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookEvent {
    /// The collection changed; carries the recomputed category set.
    QuotesChanged {
        total: usize,
        categories: Vec<String>,
    },
}

/// The quote collection service.
pub struct QuoteBook {
    local: LocalStore,
    remote: Arc<dyn QuoteRemote>,
    quotes: RwLock<Vec<Quote>>,
    tx: broadcast::Sender<BookEvent>,
}

impl QuoteBook {
    /// Load the collection from storage (seeding if nothing readable is
    /// stored) and wrap it in a shared book.
    pub async fn open(local: LocalStore, remote: Arc<dyn QuoteRemote>) -> Arc<Self> {
        let quotes = local.load().await;
        info!(count = quotes.len(), "Quote book loaded");
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            local,
            remote,
            quotes: RwLock::new(quotes),
            tx,
        })
    }

    /// Subscribe to collection change events.
    pub fn subscribe(&self) -> broadcast::Receiver<BookEvent> {
        self.tx.subscribe()
    }

    /// Copy of the current collection.
    pub async fn snapshot(&self) -> Vec<Quote> {
        self.quotes.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.quotes.read().await.is_empty()
    }

    /// Distinct categories in first-appearance order.
    pub async fn categories(&self) -> Vec<String> {
        categories(&self.quotes.read().await)
    }

    /// Add a quote. Both fields are trimmed and must be non-empty.
    ///
    /// After the local write succeeds the quote is posted to the remote
    /// endpoint in the background; that post never affects the result.
    pub async fn add(&self, text: &str, category: &str) -> Result<Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory.into());
        }

        let quote = Quote::new(text, category);
        self.append(std::slice::from_ref(&quote)).await?;
        info!(category = %quote.category, "Quote added");

        let remote = Arc::clone(&self.remote);
        let posted = quote.clone();
        tokio::spawn(async move {
            match remote.post_quote(&posted).await {
                Ok(resp) => debug!(response = %resp, "Posted quote to remote"),
                Err(e) => error!(error = %e, "Failed to post quote to remote"),
            }
        });

        Ok(quote)
    }

    /// Append externally supplied records as-is. Returns how many were added.
    pub async fn import(&self, records: Vec<Quote>) -> Result<usize> {
        let count = records.len();
        self.append(&records).await?;
        info!(count = count, "Quotes imported");
        Ok(count)
    }

    async fn append(&self, records: &[Quote]) -> std::result::Result<(), StorageError> {
        let mut quotes = self.quotes.write().await;
        let mut next = quotes.clone();
        next.extend_from_slice(records);
        self.local.save(&next).await?;
        *quotes = next;
        self.broadcast_changed(&quotes);
        Ok(())
    }

    /// Prepend remote quotes to the collection as currently stored on disk
    /// and make the result the new collection. Returns the new length.
    ///
    /// The local side is re-read from storage rather than taken from memory.
    pub async fn merge_remote(&self, remote_quotes: Vec<Quote>) -> Result<usize> {
        let mut quotes = self.quotes.write().await;
        let stored = self.local.load_stored().await?;

        let mut merged = remote_quotes;
        merged.extend(stored);
        self.local.save(&merged).await?;

        *quotes = merged;
        self.broadcast_changed(&quotes);
        Ok(quotes.len())
    }

    /// Persist a filter selection and return its view.
    pub async fn select_filter(&self, filter: CategoryFilter) -> Result<FilterView> {
        self.local.record_filter(&filter).await?;
        debug!(filter = %filter, "Filter selected");
        Ok(self.view(filter).await)
    }

    /// Re-apply the persisted filter.
    pub async fn current_view(&self) -> FilterView {
        let filter = self.local.load_filter().await;
        self.view(filter).await
    }

    async fn view(&self, filter: CategoryFilter) -> FilterView {
        FilterView::new(filter, &self.quotes.read().await)
    }

    /// Pick a quote uniformly at random and remember it for the session.
    /// Returns `None` on an empty collection.
    pub async fn random_pick(&self) -> Result<Option<Quote>> {
        let picked = {
            let quotes = self.quotes.read().await;
            quotes.choose(&mut rand::thread_rng()).cloned()
        };
        if let Some(ref quote) = picked {
            self.local.record_last_shown(quote).await?;
        }
        Ok(picked)
    }

    /// The last quote shown by `random_pick` in this session.
    pub async fn last_shown(&self) -> Option<Quote> {
        self.local.last_shown().await
    }

    fn broadcast_changed(&self, quotes: &[Quote]) {
        // Ok if nobody is listening.
        let _ = self.tx.send(BookEvent::QuotesChanged {
            total: quotes.len(),
            categories: categories(quotes),
        });
    }
}
