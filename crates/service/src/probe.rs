//! Disambiguation probe
//!
//! A "no route / no quote" rejection of a small amount often means the
//! amount is below the provider's minimum. The probe re-asks the same
//! provider for larger synthetic amounts and reclassifies from the answers.

use futures::future::join_all;
use qr_storage::QuoteCache;
use qr_types::{
	Amount, CacheValue, ClassificationRules, ErrorReason, PairKey, ProviderFailure,
	QuoteProvider, QuoteRequest, RuleOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
	/// Requests worth this many USD or more are never probed
	pub usd_threshold: f64,
	/// Multiple of the requested amount used when no USD sizing applies
	pub multiplier: u64,
	/// USD sizes of the probes when the source price is known
	pub usd_targets: Vec<f64>,
	pub timeout: Duration,
	/// Lifetime of a cached `MIN_AMOUNT`/`NO_LIQUIDITY` verdict
	pub verdict_ttl: Duration,
}

impl Default for ProbeConfig {
	fn default() -> Self {
		Self {
			usd_threshold: 50.0,
			multiplier: 200,
			usd_targets: vec![10.0, 30.0],
			timeout: Duration::from_millis(2_500),
			verdict_ttl: Duration::from_secs(120),
		}
	}
}

#[derive(Debug, Clone)]
pub struct DisambiguationProbe {
	config: ProbeConfig,
	cache: Arc<dyn QuoteCache>,
}

impl DisambiguationProbe {
	pub fn new(config: ProbeConfig, cache: Arc<dyn QuoteCache>) -> Self {
		Self { config, cache }
	}

	pub fn config(&self) -> &ProbeConfig {
		&self.config
	}

	/// Whether "too small to quote" is plausible for this request
	///
	/// A request without a usable price is probed; its value is unknown.
	pub fn is_eligible(&self, request: &QuoteRequest) -> bool {
		match request.usd_value() {
			Some(usd) => usd < self.config.usd_threshold,
			None => true,
		}
	}

	/// Synthetic amounts to try, ascending and distinct
	///
	/// With a known price each USD target is used when it exceeds the
	/// requested amount; otherwise the configured multiple stands in for it.
	pub fn probe_amounts(&self, request: &QuoteRequest) -> Vec<Amount> {
		let multiple = request.amount.scaled(self.config.multiplier);
		let mut amounts = match request.src_token.usable_price() {
			Some(price) => self
				.config
				.usd_targets
				.iter()
				.map(|usd| match Amount::from_usd(*usd, request.src_token.decimals, price) {
					Some(sized) if sized > request.amount => sized,
					_ => multiple.clone(),
				})
				.collect(),
			None => vec![multiple],
		};
		amounts.sort();
		amounts.dedup();
		amounts
	}

	/// Reclassify a "no route" candidate, consulting and updating the verdict cache
	pub async fn run(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
	) -> ErrorReason {
		let key = PairKey::verdict(provider.kind(), request);

		match self.cache.get(&key).await {
			Ok(Some(value)) => {
				if let Some((reason, amount)) = value.as_verdict() {
					if request.amount <= *amount {
						debug!("Using cached probe verdict {} for {}", reason, key);
						return reason;
					}
				}
			},
			Ok(None) => {},
			Err(e) => warn!("Verdict cache read for {} failed: {}", key, e),
		}

		let verdict = self.probe(provider, request).await;

		if verdict != ErrorReason::Timeout {
			let value = CacheValue::Verdict {
				reason: verdict,
				amount: request.amount.clone(),
			};
			if let Err(e) = self.cache.set(&key, value, self.config.verdict_ttl).await {
				warn!("Failed to cache probe verdict for {}: {}", key, e);
			}
		}

		verdict
	}

	/// Issue all probes concurrently and decide from their outcomes
	///
	/// Any success, or a rejection that itself says "amount too small",
	/// means `MIN_AMOUNT`. Otherwise any probe timeout means `TIMEOUT`.
	pub async fn probe(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
	) -> ErrorReason {
		let amounts = self.probe_amounts(request);
		info!(
			"Probing {} for {} with amounts {:?} (requested {})",
			provider.kind(),
			request.pair_label(),
			amounts.iter().map(ToString::to_string).collect::<Vec<_>>(),
			request.amount
		);

		let trials = amounts.iter().map(|amount| {
			let trial = request.with_amount(amount.clone());
			async move { provider.quote(&trial, self.config.timeout).await }
		});
		let outcomes = join_all(trials).await;

		let mut saw_timeout = false;
		for outcome in &outcomes {
			match outcome {
				Ok(quote) if quote.is_present() => return ErrorReason::MinAmount,
				Ok(_) => {},
				Err(failure) if failure.is_timeout() => saw_timeout = true,
				Err(failure) if says_too_small(provider.classification_rules(), failure) => {
					return ErrorReason::MinAmount
				},
				Err(failure) => debug!("Probe rejected: {}", failure),
			}
		}

		if saw_timeout {
			warn!(
				"Probe for {} timed out; reporting TIMEOUT instead of NO_LIQUIDITY",
				request.pair_label()
			);
			ErrorReason::Timeout
		} else {
			ErrorReason::NoLiquidity
		}
	}
}

fn says_too_small(provider_rules: &ClassificationRules, failure: &ProviderFailure) -> bool {
	let text = failure.combined_text();
	provider_rules
		.first_amount_or_route_match(&text)
		.or_else(|| ClassificationRules::defaults().first_amount_or_route_match(&text))
		== Some(RuleOutcome::MinAmount)
}
