//! Error classifier
//!
//! Reduces a provider failure to an `ErrorReason` with fixed precedence:
//! adapter timeout tag, cached minimum amount, keyword rules, then `OTHER`.

use qr_storage::QuoteCache;
use qr_types::{
	ClassificationRules, ErrorReason, FailureKind, MinAmountHint, PairKey,
	ProviderFailure, QuoteProvider, QuoteRequest, RuleOutcome,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of classifying one provider failure
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
	pub reason: ErrorReason,
	/// Keyword rule that produced the reason, if any
	pub matched: Option<RuleOutcome>,
	/// An unfixable signal was present in the failure text
	pub unfixable: bool,
	/// Cached hint that decided a `MIN_AMOUNT` reason
	pub hint: Option<MinAmountHint>,
}

impl Classification {
	fn new(reason: ErrorReason) -> Self {
		Self {
			reason,
			matched: None,
			unfixable: false,
			hint: None,
		}
	}

	/// A "no route / no quote" candidate that a larger amount might fix
	pub fn is_route_candidate(&self) -> bool {
		self.reason == ErrorReason::NoLiquidity
			&& self.matched == Some(RuleOutcome::NoRoute)
			&& !self.unfixable
	}
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier {
	cache: Arc<dyn QuoteCache>,
}

impl ErrorClassifier {
	pub fn new(cache: Arc<dyn QuoteCache>) -> Self {
		Self { cache }
	}

	/// Previously resolved minimum for this provider and pair
	pub async fn cached_hint(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
	) -> Option<MinAmountHint> {
		let key = PairKey::min_amount(provider.kind(), request);
		match self.cache.get(&key).await {
			Ok(value) => value.and_then(|value| value.as_min_amount().cloned()),
			Err(e) => {
				warn!("Cache read for {} failed, treating as miss: {}", key, e);
				None
			},
		}
	}

	pub async fn classify(
		&self,
		provider: &dyn QuoteProvider,
		request: &QuoteRequest,
		failure: &ProviderFailure,
	) -> Classification {
		if failure.is_timeout() {
			return Classification::new(ErrorReason::Timeout);
		}

		if let Some(hint) = self.cached_hint(provider, request).await {
			if request.amount < hint.min_amount {
				debug!(
					"Amount {} is below cached minimum {} for {}",
					request.amount,
					hint.min_amount,
					request.pair_label()
				);
				let mut classification = Classification::new(ErrorReason::MinAmount);
				classification.hint = Some(hint);
				return classification;
			}
		}

		let classification = classify_text(provider.classification_rules(), failure);
		debug!(
			"Classified {} failure for {} as {} (rule: {:?}, unfixable: {})",
			provider.kind(),
			request.pair_label(),
			classification.reason,
			classification.matched,
			classification.unfixable
		);
		classification
	}
}

/// Keyword-rule stage of classification
///
/// Provider rules are consulted before the shared defaults. A zero-output
/// quote with no matching text counts as "no quote".
pub fn classify_text(
	provider_rules: &ClassificationRules,
	failure: &ProviderFailure,
) -> Classification {
	let text = failure.combined_text();
	let defaults = ClassificationRules::defaults();

	let matched = provider_rules
		.first_amount_or_route_match(&text)
		.or_else(|| defaults.first_amount_or_route_match(&text))
		.or(match failure.kind {
			FailureKind::EmptyQuote => Some(RuleOutcome::NoRoute),
			_ => None,
		});
	let unfixable = provider_rules.any_unfixable(&text) || defaults.any_unfixable(&text);

	let reason = match matched {
		Some(RuleOutcome::MinAmount) => ErrorReason::MinAmount,
		Some(RuleOutcome::NoRoute) => ErrorReason::NoLiquidity,
		_ => ErrorReason::Other,
	};

	Classification {
		reason,
		matched,
		unfixable,
		hint: None,
	}
}
