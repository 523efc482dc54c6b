//! Core trait for provider adapters

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

use super::{ClassificationRules, ProviderInfo, ProviderKind, ProviderResult};
use crate::quotes::{NormalizedQuote, QuoteRequest};

lazy_static::lazy_static! {
	static ref NO_RULES: ClassificationRules = ClassificationRules::new();
}

/// Interface every liquidity/routing provider adapter implements
///
/// Implementations enforce `timeout` themselves and report an elapsed
/// deadline as `FailureKind::DeadlineExceeded`, never as a provider status.
#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
	fn provider_info(&self) -> &ProviderInfo;

	fn kind(&self) -> ProviderKind {
		self.provider_info().kind
	}

	fn id(&self) -> &str {
		&self.provider_info().provider_id
	}

	fn name(&self) -> &str {
		&self.provider_info().name
	}

	/// Deadline used for regular (non-probe) quote calls
	fn default_timeout(&self) -> Duration;

	/// Whether the provider can quote across chains
	fn supports_cross_chain(&self) -> bool;

	/// Provider-specific rules consulted before the shared defaults
	fn classification_rules(&self) -> &ClassificationRules {
		&NO_RULES
	}

	/// Request a quote, bounded by `timeout`
	async fn quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote>;
}
