//! Quote Router Storage
//!
//! Ephemeral cache backends. The in-memory backend is the default; other
//! backends implement [`QuoteCache`] to share entries across instances.

pub mod memory_store;
pub mod traits;

pub use memory_store::MemoryCache;
pub use traits::{QuoteCache, StorageError, StorageResult};
