//! Fake provider HTTP services for full-stack tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::get,
	Router,
};
use serde_json::json;

#[derive(Clone)]
struct Upstream {
	min: u128,
	quote_calls: Arc<AtomicUsize>,
}

/// Running fake provider
pub struct FakeProvider {
	pub endpoint: String,
	quote_calls: Arc<AtomicUsize>,
}

impl FakeProvider {
	pub fn quote_calls(&self) -> usize {
		self.quote_calls.load(Ordering::SeqCst)
	}
}

fn amount_param(params: &HashMap<String, String>, name: &str) -> u128 {
	params
		.get(name)
		.and_then(|value| value.parse().ok())
		.unwrap_or_default()
}

async fn direct_quote(
	State(upstream): State<Upstream>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	upstream.quote_calls.fetch_add(1, Ordering::SeqCst);
	let sell_amount = amount_param(&params, "sellAmount");
	if sell_amount < upstream.min {
		return (
			StatusCode::BAD_REQUEST,
			Json(json!({ "name": "INPUT_INVALID", "message": "sellAmount too small" })),
		)
			.into_response();
	}
	let buy_amount = sell_amount * 2;
	Json(json!({
		"liquidityAvailable": true,
		"buyAmount": buy_amount.to_string(),
		"minBuyAmount": (buy_amount - buy_amount / 100).to_string(),
		"transaction": { "to": "0x0000000000001ff3684f28c67538d4d072c22734", "data": "0xdeadbeef", "value": "0" }
	}))
	.into_response()
}

async fn direct_spender() -> Json<serde_json::Value> {
	Json(json!({ "address": "0x0000000000001ff3684f28c67538d4d072c22734" }))
}

async fn bridge_quote(
	State(upstream): State<Upstream>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	upstream.quote_calls.fetch_add(1, Ordering::SeqCst);
	let from_amount = amount_param(&params, "fromAmount");
	if from_amount < upstream.min {
		return (
			StatusCode::NOT_FOUND,
			Json(json!({ "message": "No available quotes for the requested transfer", "code": 1002 })),
		)
			.into_response();
	}
	Json(json!({
		"id": "bridge-quote",
		"estimate": {
			"toAmount": from_amount.to_string(),
			"toAmountMin": (from_amount - from_amount / 200).to_string(),
			"executionDuration": 41.2
		},
		"transactionRequest": { "to": "0x1231deb6f5749ef6ce6943a275a1d3e7486f4eae", "data": "0x01", "value": "0x0" }
	}))
	.into_response()
}

async fn serve(app: Router) -> String {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
		.await
		.expect("bind fake provider");
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		let _ = axum::serve(listener, app).await;
	});
	format!("http://{}", addr)
}

/// Direct-swap service answering only under `/swap/v1`, rejecting sells below `min`
pub async fn direct_swap(min: u128) -> FakeProvider {
	let upstream = Upstream {
		min,
		quote_calls: Arc::new(AtomicUsize::new(0)),
	};
	let quote_calls = Arc::clone(&upstream.quote_calls);
	let app = Router::new()
		.route("/swap/v1/quote", get(direct_quote))
		.route("/swap/v1/allowance/spender", get(direct_spender))
		.with_state(upstream);
	FakeProvider {
		endpoint: serve(app).await,
		quote_calls,
	}
}

/// Bridge service answering "no available quotes" below `min`
pub async fn bridge_swap(min: u128) -> FakeProvider {
	let upstream = Upstream {
		min,
		quote_calls: Arc::new(AtomicUsize::new(0)),
	};
	let quote_calls = Arc::clone(&upstream.quote_calls);
	let app = Router::new()
		.route("/v1/quote", get(bridge_quote))
		.with_state(upstream);
	FakeProvider {
		endpoint: serve(app).await,
		quote_calls,
	}
}
