//! Quote orchestrator
//!
//! Applies the routing policy, runs the selected adapters concurrently and
//! reduces failures to the caller contract through the classifier, probe
//! and resolver. Outbound calls are plain futures joined in place, so
//! dropping a `quote` future cancels every call still in flight.

use async_trait::async_trait;
use futures::future::join_all;
use qr_adapters::ProviderRegistry;
use qr_storage::QuoteCache;
use qr_types::{
	ErrorReason, NormalizedQuote, ProviderFailure, ProviderKind, QuoteFailure, QuoteProvider,
	QuoteRequest, QuoteValidationError, RouteMode,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::ErrorClassifier;
use crate::messages::failure_message;
use crate::probe::{DisambiguationProbe, ProbeConfig};
use crate::resolver::{MinAmountResolver, ResolverConfig};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteServiceError {
	#[error("Invalid quote request: {0}")]
	Validation(#[from] QuoteValidationError),

	#[error("No provider registered for route {route}")]
	NoProvider { route: RouteMode },

	#[error(transparent)]
	Failed(#[from] QuoteFailure),
}

/// Caller boundary of the engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteOrchestratorTrait: Send + Sync {
	async fn quote(&self, request: QuoteRequest) -> Result<NormalizedQuote, QuoteServiceError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrchestratorConfig {
	/// Overall handler deadline; derived from the constituent budgets when unset
	pub global_timeout: Option<Duration>,
}

/// Providers to call for a request, in tie-break order
///
/// Cross-chain requests always go to the bridge provider, whatever mode was
/// requested.
pub fn plan_route(request: &QuoteRequest) -> &'static [ProviderKind] {
	if request.is_cross_chain() {
		return &[ProviderKind::BridgeSwap];
	}
	match request.route {
		RouteMode::Direct => &[ProviderKind::DirectSwap],
		RouteMode::Bridge => &[ProviderKind::BridgeSwap],
		RouteMode::Auto => &[ProviderKind::DirectSwap, ProviderKind::BridgeSwap],
	}
}

/// Largest output wins; an exact tie goes to the direct-swap provider
pub fn select_best(quotes: Vec<NormalizedQuote>) -> Option<NormalizedQuote> {
	quotes.into_iter().fold(None, |best, candidate| match best {
		None => Some(candidate),
		Some(current) => {
			let wins = candidate.output_amount > current.output_amount
				|| (candidate.output_amount == current.output_amount
					&& candidate.provider == ProviderKind::DirectSwap
					&& current.provider != ProviderKind::DirectSwap);
			Some(if wins { candidate } else { current })
		},
	})
}

/// Failure to classify when every provider failed; earlier entries win ties
fn most_informative<T>(failures: Vec<(T, ProviderFailure)>) -> Option<(T, ProviderFailure)> {
	failures.into_iter().fold(None, |best, candidate| match best {
		Some(current) if current.1.informativeness() >= candidate.1.informativeness() => {
			Some(current)
		},
		_ => Some(candidate),
	})
}

#[derive(Debug, Clone)]
pub struct QuoteOrchestrator {
	registry: ProviderRegistry,
	classifier: ErrorClassifier,
	probe: DisambiguationProbe,
	resolver: MinAmountResolver,
	config: OrchestratorConfig,
}

impl QuoteOrchestrator {
	pub fn new(registry: ProviderRegistry, cache: Arc<dyn QuoteCache>) -> Self {
		Self::with_configs(
			registry,
			cache,
			OrchestratorConfig::default(),
			ProbeConfig::default(),
			ResolverConfig::default(),
		)
	}

	pub fn with_configs(
		registry: ProviderRegistry,
		cache: Arc<dyn QuoteCache>,
		config: OrchestratorConfig,
		probe: ProbeConfig,
		resolver: ResolverConfig,
	) -> Self {
		Self {
			registry,
			classifier: ErrorClassifier::new(cache.clone()),
			probe: DisambiguationProbe::new(probe, cache.clone()),
			resolver: MinAmountResolver::new(resolver, cache),
			config,
		}
	}

	pub fn registry(&self) -> &ProviderRegistry {
		&self.registry
	}

	/// Upper bound on the time one request may take
	///
	/// Adapters run concurrently, so only the slowest counts; the probe and
	/// resolver stages follow it sequentially.
	pub fn deadline(&self) -> Duration {
		if let Some(timeout) = self.config.global_timeout {
			return timeout;
		}
		let adapter = self
			.registry
			.kinds()
			.into_iter()
			.filter_map(|kind| self.registry.get(kind))
			.map(|provider| provider.default_timeout())
			.max()
			.unwrap_or_default();
		adapter
			.saturating_add(self.probe.config().timeout)
			.saturating_add(self.resolver.config().budget())
	}

	fn providers_for(
		&self,
		request: &QuoteRequest,
	) -> Result<Vec<Arc<dyn QuoteProvider>>, QuoteServiceError> {
		let providers: Vec<_> = plan_route(request)
			.iter()
			.filter_map(|kind| {
				let provider = self.registry.get(*kind);
				if provider.is_none() {
					warn!("No {} provider registered, skipping", kind);
				}
				provider
			})
			.collect();

		if providers.is_empty() {
			return Err(QuoteServiceError::NoProvider {
				route: request.route,
			});
		}
		Ok(providers)
	}

	/// Run the request without the overall deadline
	pub async fn execute(
		&self,
		request: &QuoteRequest,
	) -> Result<NormalizedQuote, QuoteServiceError> {
		let providers = self.providers_for(request)?;
		info!(
			"Quoting {} amount {} via {:?}",
			request.pair_label(),
			request.amount,
			providers.iter().map(|p| p.kind()).collect::<Vec<_>>()
		);

		let calls = providers.iter().map(|provider| async move {
			let outcome = provider.quote(request, provider.default_timeout()).await;
			(provider.clone(), outcome)
		});
		let outcomes = join_all(calls).await;

		let mut quotes = Vec::new();
		let mut failures = Vec::new();
		for (provider, outcome) in outcomes {
			match outcome {
				Ok(quote) if quote.is_present() => quotes.push(quote),
				Ok(_) => {
					let failure = ProviderFailure::empty_quote(provider.kind());
					failures.push((provider, failure));
				},
				Err(failure) => {
					debug!("{} failed: {}", provider.kind(), failure);
					failures.push((provider, failure));
				},
			}
		}

		if let Some(quote) = select_best(quotes) {
			info!(
				"Selected {} quote with output {} for {}",
				quote.provider,
				quote.output_amount,
				request.pair_label()
			);
			return Ok(quote);
		}

		match most_informative(failures) {
			Some((provider, failure)) => {
				Err(self.handle_failure(provider.as_ref(), request, failure).await.into())
			},
			None => Err(QuoteServiceError::NoProvider {
				route: request.route,
			}),
		}
	}

	async fn handle_failure(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
		failure: ProviderFailure,
	) -> QuoteFailure {
		let classification = self.classifier.classify(provider, request, &failure).await;
		let mut reason = classification.reason;
		let mut hint = classification.hint.clone();

		if classification.is_route_candidate() && self.probe.is_eligible(request) {
			reason = self.probe.run(provider, request).await;
		}

		if reason == ErrorReason::MinAmount && hint.is_none() {
			hint = self.resolver.resolve(provider, request).await;
		}

		let retryable = classification.is_route_candidate() && reason == ErrorReason::NoLiquidity;
		warn!(
			"Quote for {} failed on {}: {} (retryable: {}, hint: {})",
			request.pair_label(),
			provider.kind(),
			reason,
			retryable,
			hint.as_ref().map(|h| h.formatted.as_str()).unwrap_or("none")
		);

		QuoteFailure {
			reason,
			message: failure_message(reason, hint.as_ref(), classification.unfixable),
			retryable,
			min_amount_hint: hint,
		}
	}
}

#[async_trait]
impl QuoteOrchestratorTrait for QuoteOrchestrator {
	async fn quote(&self, request: QuoteRequest) -> Result<NormalizedQuote, QuoteServiceError> {
		request.validate()?;

		let deadline = self.deadline();
		match tokio::time::timeout(deadline, self.execute(&request)).await {
			Ok(result) => result,
			Err(_) => {
				warn!(
					"Quote for {} exceeded overall deadline of {}ms",
					request.pair_label(),
					deadline.as_millis()
				);
				Err(QuoteFailure::new(
					ErrorReason::Timeout,
					failure_message(ErrorReason::Timeout, None, false),
				)
				.into())
			},
		}
	}
}
