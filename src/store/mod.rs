//! Persistence layer — durable and session-scoped key-value stores.

pub mod file;
pub mod local;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
