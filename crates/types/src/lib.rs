//! Quote Router Types
//!
//! Shared models and traits for the quote router: normalized requests and
//! quotes, the provider adapter contract, failure classification rules and
//! cache keys.

pub mod adapters;
pub mod cache;
pub mod models;
pub mod quotes;

pub use serde_json;

pub use adapters::{
	ClassificationRule, ClassificationRules, FailureKind, ProviderFailure, ProviderInfo,
	ProviderKind, ProviderResult, ProviderRuntimeConfig, QuoteProvider, RuleOutcome,
};
pub use cache::{CacheNamespace, CacheValue, PairKey};
pub use models::{Amount, ChainId, ParseAmountError, SecretString, TokenDescriptor};
pub use quotes::{
	ErrorReason, FeeItem, MinAmountHint, NormalizedQuote, QuoteFailure, QuoteRequest,
	QuoteValidationError, QuoteValidationResult, RouteMode, TxDescriptor,
};
