//! Normalized quote request and validation

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{QuoteValidationError, QuoteValidationResult};
use crate::models::{Amount, ChainId, TokenDescriptor};

/// Upper bound for slippage tolerance, in percent
pub const MAX_SLIPPAGE_PERCENT: f64 = 50.0;

/// Largest token decimals accepted from the token service
pub const MAX_TOKEN_DECIMALS: u8 = 36;

/// Requested routing mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
	#[default]
	Auto,
	/// Same-chain direct-swap provider only
	Direct,
	/// Bridge-swap provider only
	Bridge,
}

impl RouteMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			RouteMode::Auto => "auto",
			RouteMode::Direct => "direct",
			RouteMode::Bridge => "bridge",
		}
	}
}

impl fmt::Display for RouteMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Quote request as accepted by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	#[serde(default)]
	pub route: RouteMode,
	pub src_chain_id: ChainId,
	pub dst_chain_id: ChainId,
	pub src_token: TokenDescriptor,
	pub dst_token: TokenDescriptor,
	/// Amount in the source token's smallest unit
	pub amount: Amount,
	pub sender: String,
	/// Defaults to the sender when absent
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recipient: Option<String>,
	/// Slippage tolerance in percent, e.g. `0.5` for 0.5%
	pub slippage_percent: f64,
}

impl QuoteRequest {
	pub fn is_cross_chain(&self) -> bool {
		self.src_chain_id != self.dst_chain_id
	}

	pub fn recipient(&self) -> &str {
		self.recipient.as_deref().unwrap_or(&self.sender)
	}

	/// Slippage tolerance in basis points
	pub fn slippage_bps(&self) -> u32 {
		(self.slippage_percent * 100.0).round().clamp(0.0, 10_000.0) as u32
	}

	/// Slippage tolerance as a fraction, e.g. `0.005`
	pub fn slippage_fraction(&self) -> f64 {
		self.slippage_percent / 100.0
	}

	/// Estimated USD value of the requested amount, when the source price is known
	pub fn usd_value(&self) -> Option<f64> {
		let price = self.src_token.usable_price()?;
		self.amount.usd_value(self.src_token.decimals, price)
	}

	/// Same request with a different source amount (probes and resolver trials)
	pub fn with_amount(&self, amount: Amount) -> Self {
		let mut request = self.clone();
		request.amount = amount;
		request
	}

	/// Short human description of the pair for logs
	pub fn pair_label(&self) -> String {
		format!(
			"{}:{} -> {}:{}",
			self.src_chain_id, self.src_token.address, self.dst_chain_id, self.dst_token.address
		)
	}

	pub fn validate(&self) -> QuoteValidationResult<()> {
		if self.amount.is_zero() {
			return Err(QuoteValidationError::InvalidAmount {
				reason: "amount must be greater than zero".to_string(),
			});
		}

		if !self.slippage_percent.is_finite()
			|| self.slippage_percent <= 0.0
			|| self.slippage_percent > MAX_SLIPPAGE_PERCENT
		{
			return Err(QuoteValidationError::InvalidSlippage {
				value: self.slippage_percent,
			});
		}

		for (field, token) in [("srcToken", &self.src_token), ("dstToken", &self.dst_token)] {
			if token.address.trim().is_empty() {
				return Err(QuoteValidationError::InvalidTokenAddress {
					field: field.to_string(),
				});
			}
			if token.decimals > MAX_TOKEN_DECIMALS {
				return Err(QuoteValidationError::InvalidDecimals {
					field: field.to_string(),
					decimals: token.decimals,
				});
			}
			if let Some(price) = token.price_usd {
				if !price.is_finite() || price < 0.0 {
					return Err(QuoteValidationError::InvalidPrice {
						field: field.to_string(),
					});
				}
			}
		}

		if self.sender.trim().is_empty() {
			return Err(QuoteValidationError::MissingRequiredField {
				field: "sender".to_string(),
			});
		}

		Ok(())
	}
}
