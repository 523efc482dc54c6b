//! Cache trait for pluggable backends

use async_trait::async_trait;
use qr_types::{CacheValue, PairKey};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
	#[error("Cache backend unavailable: {0}")]
	Unavailable(String),

	#[error("Serialization error: {0}")]
	Serialization(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Process-wide key/value cache with per-entry time-to-live
///
/// Entries are independent; `set` overwrites unconditionally and a lost
/// update between concurrent writers of the same key is acceptable.
#[async_trait]
pub trait QuoteCache: Send + Sync + Debug {
	/// Read a live entry; an expired entry is removed and reported as a miss
	async fn get(&self, key: &PairKey) -> StorageResult<Option<CacheValue>>;

	async fn set(&self, key: &PairKey, value: CacheValue, ttl: Duration) -> StorageResult<()>;

	async fn remove(&self, key: &PairKey) -> StorageResult<()>;
}
