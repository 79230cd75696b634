//! Remote collection endpoint — HTTP read of recent items and write of new
//! quotes.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::RemoteError;
use crate::quotes::model::{Quote, lenient_text};

/// Result of a remote fetch. A failed fetch is kept distinct from a
/// genuinely empty response so callers can log or report it.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Vec<Quote>),
    Failed(RemoteError),
}

impl FetchOutcome {
    /// Quotes to merge; a failure contributes nothing.
    pub fn into_quotes(self) -> Vec<Quote> {
        match self {
            Self::Fetched(quotes) => quotes,
            Self::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Read/write access to the remote quote collection.
#[async_trait]
pub trait QuoteRemote: Send + Sync {
    /// Fetch up to `limit` remote items, each mapped to a quote in `category`.
    async fn fetch_latest(&self, limit: usize, category: &str) -> FetchOutcome;

    /// Send a newly added quote. Returns the endpoint's JSON response.
    async fn post_quote(&self, quote: &Quote) -> Result<Value, RemoteError>;
}

/// Map raw remote items to quotes, keeping the first `limit`. Only each
/// item's `title` is read, and items past `limit` are never inspected.
fn items_to_quotes(items: &[Value], limit: usize, category: &str) -> Vec<Quote> {
    items
        .iter()
        .take(limit)
        .map(|item| Quote::new(lenient_text(item.get("title")), category))
        .collect()
}

/// `QuoteRemote` over HTTP with `reqwest`.
pub struct HttpRemote {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemote {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn try_fetch(&self, limit: usize, category: &str) -> Result<Vec<Quote>, RemoteError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;

        if !resp.status().is_success() {
            return Err(RemoteError::Status {
                url: self.endpoint.clone(),
                status: resp.status().as_u16(),
            });
        }

        let items: Vec<Value> = resp.json().await.map_err(|e| RemoteError::InvalidResponse {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        Ok(items_to_quotes(&items, limit, category))
    }

    fn request_failed(&self, e: reqwest::Error) -> RemoteError {
        RemoteError::RequestFailed {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl QuoteRemote for HttpRemote {
    async fn fetch_latest(&self, limit: usize, category: &str) -> FetchOutcome {
        match self.try_fetch(limit, category).await {
            Ok(quotes) => {
                debug!(count = quotes.len(), url = %self.endpoint, "Fetched remote quotes");
                FetchOutcome::Fetched(quotes)
            }
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    async fn post_quote(&self, quote: &Quote) -> Result<Value, RemoteError> {
        // `.json()` sets `Content-Type: application/json`.
        let resp = self
            .client
            .post(&self.endpoint)
            .json(quote)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;

        if !resp.status().is_success() {
            return Err(RemoteError::Status {
                url: self.endpoint.clone(),
                status: resp.status().as_u16(),
            });
        }

        resp.json().await.map_err(|e| RemoteError::InvalidResponse {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })
    }
}
