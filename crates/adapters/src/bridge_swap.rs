//! Bridge-swap adapter
//!
//! Same-chain and cross-chain quotes from a bridge aggregator. Cross-chain
//! transactions may carry a messaging fee in their native value; see
//! `NormalizedQuote::bridge_fee_excess`.

use async_trait::async_trait;
use num_bigint::BigUint;
use qr_types::{
	Amount, ClassificationRules, FeeItem, NormalizedQuote, ProviderFailure, ProviderInfo,
	ProviderKind, ProviderResult, ProviderRuntimeConfig, QuoteProvider, QuoteRequest,
	RuleOutcome, TxDescriptor,
};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::client_cache::{AuthConfig, ClientCache, ClientConfig};
use crate::endpoint::EndpointResolver;
use crate::http::{decode_response, millis, send_failure};
use crate::{AdapterError, AdapterResult};

const QUOTE_PATH: &str = "/quote";

const BRIDGE_SWAP_RULES: &[(&str, RuleOutcome)] = &[
	(r"none of the available routes", RuleOutcome::NoRoute),
	(r"amount is too low to cover", RuleOutcome::MinAmount),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeQuoteResponse {
	#[serde(default)]
	id: Option<String>,
	estimate: BridgeEstimate,
	#[serde(default)]
	transaction_request: Option<BridgeTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeEstimate {
	to_amount: String,
	#[serde(default)]
	to_amount_min: Option<String>,
	#[serde(default)]
	approval_address: Option<String>,
	#[serde(default)]
	execution_duration: Option<f64>,
	#[serde(default)]
	fee_costs: Vec<BridgeFeeCost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BridgeFeeCost {
	name: String,
	amount: String,
	#[serde(default, rename = "amountUSD")]
	amount_usd: Option<String>,
	#[serde(default)]
	token: Option<BridgeToken>,
}

#[derive(Debug, Deserialize)]
struct BridgeToken {
	address: String,
}

#[derive(Debug, Deserialize)]
struct BridgeTransaction {
	to: String,
	data: String,
	#[serde(default)]
	value: Option<String>,
}

/// Adapter for the bridge-swap aggregator
#[derive(Debug)]
pub struct BridgeSwapAdapter {
	info: ProviderInfo,
	config: ProviderRuntimeConfig,
	client: Arc<Client>,
	endpoints: EndpointResolver,
	rules: ClassificationRules,
}

impl BridgeSwapAdapter {
	/// Adapter using the shared client cache and no credentials
	pub fn new(config: ProviderRuntimeConfig) -> AdapterResult<Self> {
		Self::with_cache(config, ClientCache::for_adapter(), AuthConfig::None)
	}

	pub fn with_cache(
		config: ProviderRuntimeConfig,
		cache: ClientCache,
		auth: AuthConfig,
	) -> AdapterResult<Self> {
		let client = match &auth {
			AuthConfig::None => cache.get_client(&ClientConfig::from(&config))?,
			_ => cache.get_client_with_auth(&config, &auth)?,
		};
		let rules = ClassificationRules::from_patterns(BRIDGE_SWAP_RULES).map_err(|e| {
			AdapterError::Config {
				reason: format!("invalid bridge-swap rule: {}", e),
			}
		})?;

		Ok(Self {
			info: ProviderInfo::new(
				config.provider_id.clone(),
				ProviderKind::BridgeSwap,
				"Bridge Swap",
				"1.0.0",
			),
			config,
			client,
			endpoints: EndpointResolver::new(),
			rules,
		})
	}

	async fn fetch_quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote> {
		let from_chain = request.src_chain_id.to_string();
		let to_chain = request.dst_chain_id.to_string();
		let amount = request.amount.to_string();
		let slippage = request.slippage_fraction().to_string();
		let query = [
			("fromChain", from_chain.as_str()),
			("toChain", to_chain.as_str()),
			("fromToken", request.src_token.address.as_str()),
			("toToken", request.dst_token.address.as_str()),
			("fromAmount", amount.as_str()),
			("fromAddress", request.sender.as_str()),
			("toAddress", request.recipient()),
			("slippage", slippage.as_str()),
		];

		let response = self
			.endpoints
			.send(&self.config, QUOTE_PATH, |url| self.client.get(url).query(&query))
			.await
			.map_err(|e| send_failure(ProviderKind::BridgeSwap, e, timeout))?;

		let (body, raw) = decode_response::<BridgeQuoteResponse>(ProviderKind::BridgeSwap, response)?;
		normalize(request, body, raw)
	}
}

fn normalize(
	request: &QuoteRequest,
	body: BridgeQuoteResponse,
	raw: serde_json::Value,
) -> ProviderResult<NormalizedQuote> {
	let estimate = body.estimate;
	let output_amount = parse_decimal(&estimate.to_amount, "estimate.toAmount")?;
	if output_amount.is_zero() {
		return Err(ProviderFailure::empty_quote(ProviderKind::BridgeSwap).with_payload(raw));
	}

	let min_output_amount = match estimate.to_amount_min.as_deref() {
		Some(value) => parse_decimal(value, "estimate.toAmountMin")?,
		None => output_amount.less_bps(request.slippage_bps()),
	};

	let transaction = body
		.transaction_request
		.map(|tx| -> ProviderResult<TxDescriptor> {
			Ok(TxDescriptor {
				value: match tx.value.as_deref() {
					Some(value) => parse_quantity(value, "transactionRequest.value")?,
					None => Amount::zero(),
				},
				to: tx.to,
				data: tx.data,
			})
		})
		.transpose()?;

	let fees = estimate
		.fee_costs
		.into_iter()
		.map(|fee| -> ProviderResult<FeeItem> {
			Ok(FeeItem {
				amount: parse_decimal(&fee.amount, "feeCosts.amount")?,
				amount_usd: fee.amount_usd.and_then(|usd| usd.parse::<f64>().ok()),
				token: fee.token.map(|token| token.address),
				name: fee.name,
			})
		})
		.collect::<ProviderResult<Vec<_>>>()?;

	Ok(NormalizedQuote {
		quote_id: body
			.id
			.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
		provider: ProviderKind::BridgeSwap,
		output_amount,
		min_output_amount,
		approval_target: estimate.approval_address,
		transaction,
		fees,
		estimated_duration_secs: estimate
			.execution_duration
			.filter(|secs| secs.is_finite() && *secs >= 0.0)
			.map(|secs| secs.ceil() as u64),
	})
}

fn parse_decimal(value: &str, field: &str) -> ProviderResult<Amount> {
	value.parse::<Amount>().map_err(|e| {
		ProviderFailure::decode(ProviderKind::BridgeSwap, format!("{}: {}", field, e))
	})
}

/// Transaction values arrive either as `0x` hex quantities or decimal strings
fn parse_quantity(value: &str, field: &str) -> ProviderResult<Amount> {
	match value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
	{
		Some("") => Ok(Amount::zero()),
		Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16)
			.map(Amount::from)
			.ok_or_else(|| {
				ProviderFailure::decode(
					ProviderKind::BridgeSwap,
					format!("{}: invalid hex quantity '{}'", field, value),
				)
			}),
		None => parse_decimal(value, field),
	}
}

#[async_trait]
impl QuoteProvider for BridgeSwapAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn default_timeout(&self) -> Duration {
		Duration::from_millis(self.config.timeout_ms)
	}

	fn supports_cross_chain(&self) -> bool {
		true
	}

	fn classification_rules(&self) -> &ClassificationRules {
		&self.rules
	}

	async fn quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote> {
		debug!(
			"Bridge-swap quote request for {} amount {} (timeout {}ms)",
			request.pair_label(),
			request.amount,
			millis(timeout)
		);

		match tokio::time::timeout(timeout, self.fetch_quote(request, timeout)).await {
			Ok(result) => result,
			Err(_) => Err(ProviderFailure::deadline_exceeded(
				ProviderKind::BridgeSwap,
				millis(timeout),
			)),
		}
	}
}
