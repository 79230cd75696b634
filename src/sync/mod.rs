//! Periodic reconciliation with the remote collection.

pub mod reconciler;

pub use reconciler::{Reconciler, SyncConfig, SyncOutcome, SyncReport, SyncState, spawn_sync_ticker};
