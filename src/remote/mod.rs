//! Remote collection endpoint client.

pub mod client;
#[cfg(test)]
pub(crate) mod stub;

pub use client::{FetchOutcome, HttpRemote, QuoteRemote};
