//! In-process `QuoteRemote` for unit tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::client::{FetchOutcome, QuoteRemote};
use crate::error::RemoteError;
use crate::quotes::model::Quote;

/// Returns a fixed set of titles (or a failure) and records posted quotes.
pub struct StubRemote {
    titles: Option<Vec<String>>,
    fetch_delay: Duration,
    fail_posts: bool,
    posted_tx: mpsc::UnboundedSender<Quote>,
}

impl StubRemote {
    /// A remote whose reads return `titles`. The receiver yields every
    /// posted quote.
    pub fn new(titles: &[&str]) -> (Self, mpsc::UnboundedReceiver<Quote>) {
        let (posted_tx, posted_rx) = mpsc::unbounded_channel();
        let stub = Self {
            titles: Some(titles.iter().map(|t| t.to_string()).collect()),
            fetch_delay: Duration::ZERO,
            fail_posts: false,
            posted_tx,
        };
        (stub, posted_rx)
    }

    /// A remote whose reads and writes always fail.
    pub fn failing() -> (Self, mpsc::UnboundedReceiver<Quote>) {
        let (mut stub, rx) = Self::new(&[]);
        stub.titles = None;
        stub.fail_posts = true;
        (stub, rx)
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    fn error() -> RemoteError {
        RemoteError::RequestFailed {
            url: "stub://remote".into(),
            reason: "stubbed failure".into(),
        }
    }
}

#[async_trait]
impl QuoteRemote for StubRemote {
    async fn fetch_latest(&self, limit: usize, category: &str) -> FetchOutcome {
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        match &self.titles {
            Some(titles) => FetchOutcome::Fetched(
                titles
                    .iter()
                    .take(limit)
                    .map(|t| Quote::new(t.as_str(), category))
                    .collect(),
            ),
            None => FetchOutcome::Failed(Self::error()),
        }
    }

    async fn post_quote(&self, quote: &Quote) -> Result<serde_json::Value, RemoteError> {
        let _ = self.posted_tx.send(quote.clone());
        if self.fail_posts {
            return Err(Self::error());
        }
        Ok(serde_json::json!({ "id": 101, "text": quote.text, "category": quote.category }))
    }
}
