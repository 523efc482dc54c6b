//! Provider adapter domain model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub mod errors;
pub mod rules;
pub mod traits;

pub use errors::{FailureKind, ProviderFailure};
pub use rules::{ClassificationRule, ClassificationRules, RuleOutcome};
pub use traits::QuoteProvider;

/// Result type for provider quote calls
pub type ProviderResult<T> = Result<T, ProviderFailure>;

/// The two provider variants the routing policy knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
	/// Same-chain swap aggregator
	DirectSwap,
	/// Bridge/swap aggregator, same-chain or cross-chain
	BridgeSwap,
}

impl ProviderKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ProviderKind::DirectSwap => "direct-swap",
			ProviderKind::BridgeSwap => "bridge-swap",
		}
	}
}

impl fmt::Display for ProviderKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Static description of an adapter instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
	pub provider_id: String,
	pub kind: ProviderKind,
	pub name: String,
	pub version: String,
}

impl ProviderInfo {
	pub fn new(
		provider_id: impl Into<String>,
		kind: ProviderKind,
		name: impl Into<String>,
		version: impl Into<String>,
	) -> Self {
		Self {
			provider_id: provider_id.into(),
			kind,
			name: name.into(),
			version: version.into(),
		}
	}
}

/// Runtime connection settings handed to an adapter
///
/// `path_prefixes` lists the API mount points to try in order. A single
/// entry is a fully resolved endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRuntimeConfig {
	pub provider_id: String,
	pub endpoint: String,
	pub path_prefixes: Vec<String>,
	pub timeout_ms: u64,
	pub headers: Option<HashMap<String, String>>,
}

impl ProviderRuntimeConfig {
	pub fn new(provider_id: impl Into<String>, endpoint: impl Into<String>, timeout_ms: u64) -> Self {
		Self {
			provider_id: provider_id.into(),
			endpoint: endpoint.into(),
			path_prefixes: vec![String::new()],
			timeout_ms,
			headers: None,
		}
	}

	pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
		if !prefixes.is_empty() {
			self.path_prefixes = prefixes;
		}
		self
	}

	pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
		self.headers = Some(headers);
		self
	}
}
