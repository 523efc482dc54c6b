//! Request fixtures

use quote_router::models::{Amount, QuoteRequest, RouteMode, TokenDescriptor};
use serde_json::{json, Value};

pub const USDC: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const WETH: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
pub const SENDER: &str = "0x742d35Cc6634C0532925a3b8D2a27F79c5a85b03";

/// Same-chain request selling `amount` raw units of a 6-decimal token
pub fn same_chain(amount: u64, price_usd: Option<f64>) -> QuoteRequest {
	let mut src = TokenDescriptor::new(USDC, 6);
	src.price_usd = price_usd;
	QuoteRequest {
		route: RouteMode::Auto,
		src_chain_id: 1,
		dst_chain_id: 1,
		src_token: src,
		dst_token: TokenDescriptor::new(WETH, 18),
		amount: Amount::from(amount),
		sender: SENDER.to_string(),
		recipient: None,
		slippage_percent: 0.5,
	}
}

pub fn cross_chain(amount: u64, route: RouteMode) -> QuoteRequest {
	let mut request = same_chain(amount, Some(1.0));
	request.dst_chain_id = 42161;
	request.route = route;
	request
}

pub fn body(request: &QuoteRequest) -> Value {
	serde_json::to_value(request).unwrap()
}

/// One whole unit of a token priced at $2
pub fn two_dollar_token_body() -> Value {
	json!({
		"srcChainId": 10,
		"dstChainId": 10,
		"srcToken": { "address": "0x4200000000000000000000000000000000000042", "decimals": 18, "priceUsd": 2.0 },
		"dstToken": { "address": "0x0b2C639c533813f4Aa9D7837CAf62653d097Ff85", "decimals": 6 },
		"amount": "1000000000000000000",
		"sender": SENDER,
		"slippagePercent": 1.0
	})
}
