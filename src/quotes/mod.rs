//! Quotes — data model, the collection service, and file transfer.

pub mod book;
pub mod model;
pub mod transfer;

pub use book::{BookEvent, QuoteBook};
pub use model::{CategoryFilter, FilterView, Quote};
