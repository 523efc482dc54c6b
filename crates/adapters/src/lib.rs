//! Quote Router Adapters
//!
//! Provider-specific adapters for the quote routing engine.

use qr_types::{ProviderKind, QuoteProvider};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod bridge_swap;
pub mod client_cache;
pub mod direct_swap;
pub mod endpoint;
mod http;

pub use bridge_swap::BridgeSwapAdapter;
pub use client_cache::{AuthConfig, ClientCache, ClientConfig};
pub use direct_swap::DirectSwapAdapter;
pub use endpoint::{EndpointResolver, ProviderResponse};

/// Errors raised while constructing adapters (not while quoting)
#[derive(Error, Debug)]
pub enum AdapterError {
	#[error("HTTP client construction failed: {0}")]
	HttpClient(#[from] reqwest::Error),

	#[error("Adapter configuration error: {reason}")]
	Config { reason: String },

	#[error("No adapter registered for {kind}")]
	NotRegistered { kind: ProviderKind },
}

pub type AdapterResult<T> = Result<T, AdapterError>;

/// One adapter per provider kind
#[derive(Debug, Default, Clone)]
pub struct ProviderRegistry {
	providers: HashMap<ProviderKind, Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an adapter, replacing any previous one of the same kind
	pub fn register(&mut self, provider: Arc<dyn QuoteProvider>) -> Option<Arc<dyn QuoteProvider>> {
		self.providers.insert(provider.kind(), provider)
	}

	pub fn with(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
		self.register(provider);
		self
	}

	pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn QuoteProvider>> {
		self.providers.get(&kind).cloned()
	}

	/// Like `get`, but a missing adapter is an error
	pub fn require(&self, kind: ProviderKind) -> AdapterResult<Arc<dyn QuoteProvider>> {
		self.get(kind).ok_or(AdapterError::NotRegistered { kind })
	}

	pub fn contains(&self, kind: ProviderKind) -> bool {
		self.providers.contains_key(&kind)
	}

	pub fn kinds(&self) -> Vec<ProviderKind> {
		let mut kinds: Vec<_> = self.providers.keys().copied().collect();
		kinds.sort_by_key(|kind| kind.as_str());
		kinds
	}

	pub fn len(&self) -> usize {
		self.providers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.is_empty()
	}
}
