//! Notice board — transient notifications that dismiss themselves, with
//! broadcast fan-out to whoever is displaying them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub posted_at: DateTime<Utc>,
    pub ttl: Duration,
}

/// Board events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeEvent {
    Posted(Notice),
    Dismissed { id: u64 },
}

/// Active notices plus a broadcast channel for display.
pub struct NoticeBoard {
    active: RwLock<Vec<Notice>>,
    next_id: AtomicU64,
    tx: broadcast::Sender<NoticeEvent>,
}

impl NoticeBoard {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Arc::new(Self {
            active: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            tx,
        })
    }

    /// Subscribe to posted/dismissed events.
    pub fn subscribe(&self) -> broadcast::Receiver<NoticeEvent> {
        self.tx.subscribe()
    }

    /// Post a notice that dismisses itself after `ttl`.
    pub async fn post(self: &Arc<Self>, message: impl Into<String>, ttl: Duration) -> Notice {
        let notice = Notice {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            posted_at: Utc::now(),
            ttl,
        };

        self.active.write().await.push(notice.clone());
        // Ok if nobody is listening.
        let _ = self.tx.send(NoticeEvent::Posted(notice.clone()));

        let board = Arc::clone(self);
        let id = notice.id;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            board.dismiss(id).await;
        });

        notice
    }

    /// Remove a notice early. Returns false if it was already gone.
    pub async fn dismiss(&self, id: u64) -> bool {
        let mut active = self.active.write().await;
        let before = active.len();
        active.retain(|n| n.id != id);
        if active.len() == before {
            return false;
        }
        debug!(notice_id = id, "Notice dismissed");
        let _ = self.tx.send(NoticeEvent::Dismissed { id });
        true
    }

    /// Currently visible notices, oldest first.
    pub async fn active(&self) -> Vec<Notice> {
        self.active.read().await.clone()
    }
}
