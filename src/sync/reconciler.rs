//! Reconciler — pulls recent remote items and prepends them to the stored
//! quote collection.
//!
//! Two states, `Idle` and `Syncing`. A trigger that arrives while a run is in
//! flight is skipped rather than queued. The ticker spawns each run without
//! awaiting it, so a slow remote never shifts the schedule.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::notices::NoticeBoard;
use crate::quotes::{FilterView, QuoteBook};
use crate::remote::{FetchOutcome, QuoteRemote};

/// Message shown after a successful run.
pub const SYNCED_NOTICE: &str = "Quotes synced with server!";

/// Reconciler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Remote quotes prepended.
    pub fetched: usize,
    /// Whether the fetch failed (and contributed nothing).
    pub fetch_failed: bool,
    /// Collection length after the merge.
    pub total: usize,
    /// The persisted filter re-applied to the merged collection.
    pub view: FilterView,
}

/// Result of one trigger.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// Another run was already in flight.
    Skipped,
    /// The merge could not be read or persisted; nothing changed.
    Failed(String),
}

/// Tunables taken from `AppConfig`.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub fetch_limit: usize,
    pub server_category: String,
    pub notice_ttl: Duration,
}

impl From<&AppConfig> for SyncConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            fetch_limit: config.fetch_limit,
            server_category: config.server_category.clone(),
            notice_ttl: config.notice_ttl,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// Merges remote items into the quote book.
pub struct Reconciler {
    config: SyncConfig,
    book: Arc<QuoteBook>,
    remote: Arc<dyn QuoteRemote>,
    notices: Arc<NoticeBoard>,
    syncing: AtomicBool,
}

/// Resets the state to `Idle` however the run ends.
struct SyncingGuard<'a>(&'a AtomicBool);

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Reconciler {
    pub fn new(
        config: SyncConfig,
        book: Arc<QuoteBook>,
        remote: Arc<dyn QuoteRemote>,
        notices: Arc<NoticeBoard>,
    ) -> Self {
        Self {
            config,
            book,
            remote,
            notices,
            syncing: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.syncing.load(Ordering::Acquire) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    /// Run one reconciliation.
    pub async fn run_once(&self) -> SyncOutcome {
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync already in flight, skipping trigger");
            return SyncOutcome::Skipped;
        }
        let _guard = SyncingGuard(&self.syncing);

        let outcome = self
            .remote
            .fetch_latest(self.config.fetch_limit, &self.config.server_category)
            .await;
        let fetch_failed = outcome.is_failed();
        if let FetchOutcome::Failed(ref e) = outcome {
            error!(error = %e, "Error fetching quotes from server");
        }
        let remote_quotes = outcome.into_quotes();
        let fetched = remote_quotes.len();

        let total = match self.book.merge_remote(remote_quotes).await {
            Ok(total) => total,
            Err(e) => {
                error!(error = %e, "Error syncing quotes");
                return SyncOutcome::Failed(e.to_string());
            }
        };

        let view = self.book.current_view().await;
        self.notices
            .post(SYNCED_NOTICE, self.config.notice_ttl)
            .await;
        info!(fetched, total, fetch_failed, "Quotes synced with server");

        SyncOutcome::Completed(SyncReport {
            fetched,
            fetch_failed,
            total,
            view,
        })
    }
}

/// Spawn the recurring sync trigger.
///
/// The first immediate tick is skipped. Each later tick spawns its own run,
/// and every completed run's report is sent on `reports` so the caller can
/// redisplay the refreshed view. A closed receiver is ignored.
pub fn spawn_sync_ticker(
    reconciler: Arc<Reconciler>,
    period: Duration,
    reports: mpsc::UnboundedSender<SyncReport>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let reconciler = Arc::clone(&reconciler);
            let reports = reports.clone();
            tokio::spawn(async move {
                match reconciler.run_once().await {
                    SyncOutcome::Completed(report) => {
                        let _ = reports.send(report);
                    }
                    SyncOutcome::Skipped => warn!("Previous sync still running, tick skipped"),
                    SyncOutcome::Failed(_) => {}
                }
            });
        }
    })
}
