//! In-memory TTL cache backed by DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use qr_types::{CacheValue, PairKey};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::traits::{QuoteCache, StorageResult};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
	value: V,
	/// `None` when the TTL reaches past what `Instant` can represent
	expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
	fn is_expired(&self, now: Instant) -> bool {
		self.expires_at.is_some_and(|expires_at| now >= expires_at)
	}
}

/// TTL map with lazy eviction on read; no size bound and no background sweep
#[derive(Debug, Clone)]
pub struct MemoryCache<V = CacheValue> {
	entries: Arc<DashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> MemoryCache<V> {
	pub fn new() -> Self {
		Self {
			entries: Arc::new(DashMap::new()),
		}
	}

	pub fn get_value(&self, key: &str) -> Option<V> {
		let now = Instant::now();
		let removed = self
			.entries
			.remove_if(key, |_, entry| entry.is_expired(now));
		if removed.is_some() {
			debug!("Evicted expired cache entry {}", key);
			return None;
		}

		self.entries.get(key).map(|entry| entry.value.clone())
	}

	pub fn set_value(&self, key: &str, value: V, ttl: Duration) {
		let entry = CacheEntry {
			value,
			expires_at: Instant::now().checked_add(ttl),
		};
		self.entries.insert(key.to_string(), entry);
	}

	pub fn remove_value(&self, key: &str) {
		self.entries.remove(key);
	}

	/// Number of stored entries, including expired ones not yet read
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<V: Clone> Default for MemoryCache<V> {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl QuoteCache for MemoryCache<CacheValue> {
	async fn get(&self, key: &PairKey) -> StorageResult<Option<CacheValue>> {
		Ok(self.get_value(key.as_str()))
	}

	async fn set(&self, key: &PairKey, value: CacheValue, ttl: Duration) -> StorageResult<()> {
		self.set_value(key.as_str(), value, ttl);
		Ok(())
	}

	async fn remove(&self, key: &PairKey) -> StorageResult<()> {
		self.remove_value(key.as_str());
		Ok(())
	}
}
