//! Minimum-amount resolver
//!
//! Finds the smallest source amount a provider will quote for a pair: an
//! exponential sweep (x10 per step, all candidates concurrently) brackets
//! the threshold, then a bounded binary search tightens the upper bound.

use futures::future::join_all;
use qr_storage::QuoteCache;
use qr_types::{Amount, CacheValue, MinAmountHint, PairKey, QuoteProvider, QuoteRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
	pub exponential_steps: u32,
	pub binary_iterations: u32,
	/// Deadline of each trial quote
	pub trial_timeout: Duration,
	/// Lifetime of a cached hint
	pub hint_ttl: Duration,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			exponential_steps: 8,
			binary_iterations: 6,
			trial_timeout: Duration::from_millis(2_500),
			hint_ttl: Duration::from_secs(300),
		}
	}
}

impl ResolverConfig {
	/// Worst-case wall time of one resolution
	pub fn budget(&self) -> Duration {
		self.trial_timeout
			.saturating_mul(self.binary_iterations.saturating_add(1))
	}
}

#[derive(Debug, Clone)]
pub struct MinAmountResolver {
	config: ResolverConfig,
	cache: Arc<dyn QuoteCache>,
}

impl MinAmountResolver {
	pub fn new(config: ResolverConfig, cache: Arc<dyn QuoteCache>) -> Self {
		Self { config, cache }
	}

	pub fn config(&self) -> &ResolverConfig {
		&self.config
	}

	/// Resolve, wrap and cache the minimum for the request's pair
	///
	/// `None` when the exponential sweep finds no succeeding amount.
	pub async fn resolve(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
	) -> Option<MinAmountHint> {
		let minimum = self.search(provider, request).await?;
		let hint = build_hint(request, minimum);

		let key = PairKey::min_amount(provider.kind(), request);
		if let Err(e) = self
			.cache
			.set(&key, CacheValue::MinAmount(hint.clone()), self.config.hint_ttl)
			.await
		{
			warn!("Failed to cache minimum amount for {}: {}", key, e);
		}

		info!(
			"Resolved minimum {} ({}) for {} on {}",
			hint.min_amount,
			hint.formatted,
			request.pair_label(),
			provider.kind()
		);
		Some(hint)
	}

	/// Smallest amount observed to succeed, within the iteration budget
	pub async fn search(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
	) -> Option<Amount> {
		let candidates: Vec<Amount> = (1..=self.config.exponential_steps)
			.map(|step| request.amount.scaled_pow10(step))
			.collect();

		let trials = candidates
			.iter()
			.map(|amount| self.trial(provider, request, amount));
		let results = join_all(trials).await;
		let first_success = results.iter().position(|ok| *ok);

		let Some(index) = first_success else {
			debug!(
				"Exponential sweep found no quotable amount for {} up to {}",
				request.pair_label(),
				candidates.last().map(ToString::to_string).unwrap_or_default()
			);
			return None;
		};

		let mut upper = candidates[index].clone();
		let mut lower = if index == 0 {
			request.amount.clone()
		} else {
			candidates[index - 1].clone()
		};

		for _ in 0..self.config.binary_iterations {
			if !lower.has_gap_to(&upper) {
				break;
			}
			let mid = lower.midpoint_above(&upper);
			if self.trial(provider, request, &mid).await {
				upper = mid;
			} else {
				lower = mid;
			}
		}

		debug!(
			"Binary search for {} settled on ({}, {}]",
			request.pair_label(),
			lower,
			upper
		);
		Some(upper)
	}

	async fn trial(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
		amount: &Amount,
	) -> bool {
		let trial = request.with_amount(amount.clone());
		match provider.quote(&trial, self.config.trial_timeout).await {
			Ok(quote) => quote.is_present(),
			Err(failure) => {
				debug!("Trial at {} failed: {}", amount, failure);
				false
			},
		}
	}
}

/// Wrap a raw minimum with its formatted value and USD estimate
pub fn build_hint(request: &QuoteRequest, min_amount: Amount) -> MinAmountHint {
	let token = &request.src_token;
	MinAmountHint {
		formatted: min_amount.format_units(token.decimals),
		usd_estimate: token
			.usable_price()
			.and_then(|price| min_amount.usd_value(token.decimals, price)),
		min_amount,
	}
}
