//! Chain and token descriptors

use serde::{Deserialize, Serialize};

/// EVM-style chain identifier
pub type ChainId = u64;

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
const NATIVE_SENTINEL: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

/// Token as supplied by the caller's token/price services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDescriptor {
	pub address: String,
	pub decimals: u8,
	/// Per-unit USD price, when the price service knows one
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price_usd: Option<f64>,
}

impl TokenDescriptor {
	pub fn new(address: impl Into<String>, decimals: u8) -> Self {
		Self {
			address: address.into(),
			decimals,
			price_usd: None,
		}
	}

	pub fn with_price(mut self, price_usd: f64) -> Self {
		self.price_usd = Some(price_usd);
		self
	}

	/// Lower-cased address used for cache keys and comparisons
	pub fn normalized_address(&self) -> String {
		self.address.trim().to_ascii_lowercase()
	}

	/// Whether this descriptor denotes the chain's native asset
	pub fn is_native(&self) -> bool {
		let address = self.normalized_address();
		address == ZERO_ADDRESS || address == NATIVE_SENTINEL
	}

	/// Price usable for USD arithmetic (known, finite, positive)
	pub fn usable_price(&self) -> Option<f64> {
		self.price_usd.filter(|p| p.is_finite() && *p > 0.0)
	}
}
