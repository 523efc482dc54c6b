//! Normalized provider quote

use serde::{Deserialize, Serialize};

use crate::adapters::ProviderKind;
use crate::models::{Amount, TokenDescriptor};

/// Transaction the caller would sign to execute the quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxDescriptor {
	pub to: String,
	pub data: String,
	/// Native value attached to the transaction
	pub value: Amount,
}

/// One line of a provider's fee breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeItem {
	pub name: String,
	pub amount: Amount,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amount_usd: Option<f64>,
}

/// Provider quote reduced to the shared contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuote {
	pub quote_id: String,
	pub provider: ProviderKind,
	pub output_amount: Amount,
	/// Output after the request's slippage tolerance
	pub min_output_amount: Amount,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub approval_target: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction: Option<TxDescriptor>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub fees: Vec<FeeItem>,
	/// Estimated execution time in seconds, when the provider reports one
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub estimated_duration_secs: Option<u64>,
}

impl NormalizedQuote {
	/// A zero-output quote is not a trade
	pub fn is_present(&self) -> bool {
		!self.output_amount.is_zero()
	}

	/// Native value the transaction carries beyond the trade itself
	///
	/// Bridge transactions embed a messaging fee in the native value. When the
	/// source asset is native the trade amount is part of the value and is
	/// subtracted; otherwise the whole value is fee.
	pub fn bridge_fee_excess(
		&self,
		source_token: &TokenDescriptor,
		trade_amount: &Amount,
	) -> Option<Amount> {
		let tx = self.transaction.as_ref()?;
		if source_token.is_native() {
			Some(tx.value.saturating_sub(trade_amount))
		} else {
			Some(tx.value.clone())
		}
	}
}
