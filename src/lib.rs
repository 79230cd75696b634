//! Quotebook — a local quote collection with periodic server sync.

pub mod cli;
pub mod config;
pub mod error;
pub mod notices;
pub mod quotes;
pub mod remote;
pub mod store;
pub mod sync;
