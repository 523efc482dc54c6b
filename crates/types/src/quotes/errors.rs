//! Caller-facing failure contract

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::Amount;

/// Validation errors for quote requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteValidationError {
	#[error("Invalid amount: {reason}")]
	InvalidAmount { reason: String },

	#[error("Invalid slippage tolerance: {value} (must be within (0, 50] percent)")]
	InvalidSlippage { value: f64 },

	#[error("Invalid token address: {field}")]
	InvalidTokenAddress { field: String },

	#[error("Invalid decimals for {field}: {decimals}")]
	InvalidDecimals { field: String, decimals: u8 },

	#[error("Invalid USD price for {field}")]
	InvalidPrice { field: String },

	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },
}

/// Classified cause of a failed quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorReason {
	MinAmount,
	NoLiquidity,
	Timeout,
	Other,
}

impl ErrorReason {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorReason::MinAmount => "MIN_AMOUNT",
			ErrorReason::NoLiquidity => "NO_LIQUIDITY",
			ErrorReason::Timeout => "TIMEOUT",
			ErrorReason::Other => "OTHER",
		}
	}
}

impl fmt::Display for ErrorReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Smallest amount a provider was observed to quote for a pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinAmountHint {
	pub min_amount: Amount,
	pub formatted: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub usd_estimate: Option<f64>,
}

/// Failure returned across the caller boundary
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{reason}: {message}")]
pub struct QuoteFailure {
	pub reason: ErrorReason,
	pub message: String,
	pub retryable: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_amount_hint: Option<MinAmountHint>,
}

impl QuoteFailure {
	pub fn new(reason: ErrorReason, message: impl Into<String>) -> Self {
		Self {
			reason,
			message: message.into(),
			retryable: false,
			min_amount_hint: None,
		}
	}

	pub fn timeout(message: impl Into<String>) -> Self {
		Self::new(ErrorReason::Timeout, message)
	}
}
