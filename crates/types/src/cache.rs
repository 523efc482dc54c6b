//! Keys and values for the ephemeral quote cache

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::adapters::ProviderKind;
use crate::models::Amount;
use crate::quotes::{ErrorReason, MinAmountHint, QuoteRequest};

/// What a cache entry memoizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
	/// Resolved minimum amount for a pair
	MinAmount,
	/// Disambiguation verdict for a pair
	Verdict,
}

impl CacheNamespace {
	fn prefix(&self) -> &'static str {
		match self {
			CacheNamespace::MinAmount => "min",
			CacheNamespace::Verdict => "verdict",
		}
	}
}

/// Composite cache key: provider, router, both chains and both tokens
///
/// Token addresses are lower-cased so checksummed and plain spellings share
/// an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey(String);

impl PairKey {
	pub fn new(namespace: CacheNamespace, provider: ProviderKind, request: &QuoteRequest) -> Self {
		Self(format!(
			"{}:{}:{}:{}:{}:{}:{}",
			namespace.prefix(),
			provider.as_str(),
			request.route.as_str(),
			request.src_chain_id,
			request.dst_chain_id,
			request.src_token.normalized_address(),
			request.dst_token.normalized_address(),
		))
	}

	pub fn min_amount(provider: ProviderKind, request: &QuoteRequest) -> Self {
		Self::new(CacheNamespace::MinAmount, provider, request)
	}

	pub fn verdict(provider: ProviderKind, request: &QuoteRequest) -> Self {
		Self::new(CacheNamespace::Verdict, provider, request)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PairKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Values stored in the quote cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CacheValue {
	MinAmount(MinAmountHint),
	/// Probe verdict, valid for requests up to `amount`
	Verdict { reason: ErrorReason, amount: Amount },
}

impl CacheValue {
	pub fn as_min_amount(&self) -> Option<&MinAmountHint> {
		match self {
			CacheValue::MinAmount(hint) => Some(hint),
			_ => None,
		}
	}

	pub fn as_verdict(&self) -> Option<(ErrorReason, &Amount)> {
		match self {
			CacheValue::Verdict { reason, amount } => Some((*reason, amount)),
			_ => None,
		}
	}
}
