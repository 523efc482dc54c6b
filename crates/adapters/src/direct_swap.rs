//! Direct-swap adapter
//!
//! Same-chain swap aggregator. Quotes come from `GET {prefix}/quote`; the
//! allowance spender is looked up from `GET {prefix}/allowance/spender` on a
//! best-effort basis and never fails the quote. A found spender is kept per
//! chain for the adapter's lifetime.

use async_trait::async_trait;
use dashmap::DashMap;
use qr_types::{
	Amount, ClassificationRules, FeeItem, NormalizedQuote, ProviderFailure, ProviderInfo,
	ChainId, ProviderKind, ProviderResult, ProviderRuntimeConfig, QuoteProvider,
	QuoteRequest, RuleOutcome, TxDescriptor,
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
const SPENDER_PATH: &str = "/allowance/spender";
const DEFAULT_SPENDER_TIMEOUT_MS: u64 = 1_500;

const DIRECT_SWAP_RULES: &[(&str, RuleOutcome)] = &[
	(r"insufficient[_\s]asset[_\s]liquidity", RuleOutcome::NoRoute),
	(r"sell\s*amount.*too\s+small", RuleOutcome::MinAmount),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectQuoteResponse {
	#[serde(default)]
	liquidity_available: Option<bool>,
	#[serde(default)]
	buy_amount: Option<String>,
	#[serde(default)]
	min_buy_amount: Option<String>,
	#[serde(default)]
	allowance_target: Option<String>,
	#[serde(default)]
	transaction: Option<DirectTransaction>,
	#[serde(default)]
	fees: Vec<DirectFee>,
}

#[derive(Debug, Deserialize)]
struct DirectTransaction {
	to: String,
	data: String,
	#[serde(default)]
	value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectFee {
	#[serde(rename = "type")]
	name: String,
	amount: String,
	#[serde(default)]
	token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpenderResponse {
	address: String,
}

/// Adapter for the same-chain direct-swap provider
#[derive(Debug)]
pub struct DirectSwapAdapter {
	info: ProviderInfo,
	config: ProviderRuntimeConfig,
	client: Arc<Client>,
	endpoints: EndpointResolver,
	rules: ClassificationRules,
	spender_timeout: Duration,
	spenders: DashMap<ChainId, String>,
}

impl DirectSwapAdapter {
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
		let rules = ClassificationRules::from_patterns(DIRECT_SWAP_RULES).map_err(|e| {
			AdapterError::Config {
				reason: format!("invalid direct-swap rule: {}", e),
			}
		})?;

		Ok(Self {
			info: ProviderInfo::new(
				config.provider_id.clone(),
				ProviderKind::DirectSwap,
				"Direct Swap",
				"1.0.0",
			),
			config,
			client,
			endpoints: EndpointResolver::new(),
			rules,
			spender_timeout: Duration::from_millis(DEFAULT_SPENDER_TIMEOUT_MS),
			spenders: DashMap::new(),
		})
	}

	/// Deadline for the best-effort spender lookup
	pub fn with_spender_timeout(mut self, timeout: Duration) -> Self {
		self.spender_timeout = timeout;
		self
	}

	async fn fetch_quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote> {
		let slippage_bps = request.slippage_bps().to_string();
		let amount = request.amount.to_string();
		let chain_id = request.src_chain_id.to_string();
		let query = [
			("chainId", chain_id.as_str()),
			("sellToken", request.src_token.address.as_str()),
			("buyToken", request.dst_token.address.as_str()),
			("sellAmount", amount.as_str()),
			("taker", request.sender.as_str()),
			("recipient", request.recipient()),
			("slippageBps", slippage_bps.as_str()),
		];

		let response = self
			.endpoints
			.send(&self.config, QUOTE_PATH, |url| self.client.get(url).query(&query))
			.await
			.map_err(|e| send_failure(ProviderKind::DirectSwap, e, timeout))?;

		let (body, raw) = decode_response::<DirectQuoteResponse>(ProviderKind::DirectSwap, response)?;
		self.normalize(request, body, raw)
	}

	fn normalize(
		&self,
		request: &QuoteRequest,
		body: DirectQuoteResponse,
		raw: serde_json::Value,
	) -> ProviderResult<NormalizedQuote> {
		if body.liquidity_available == Some(false) {
			return Err(ProviderFailure::new(
				ProviderKind::DirectSwap,
				qr_types::FailureKind::EmptyQuote,
				"no route: liquidity unavailable",
			)
			.with_payload(raw));
		}

		let output_amount = parse_amount(body.buy_amount.as_deref(), "buyAmount")?;
		if output_amount.is_zero() {
			return Err(ProviderFailure::empty_quote(ProviderKind::DirectSwap).with_payload(raw));
		}

		let min_output_amount = match body.min_buy_amount.as_deref() {
			Some(value) => parse_amount(Some(value), "minBuyAmount")?,
			None => output_amount.less_bps(request.slippage_bps()),
		};

		let transaction = body
			.transaction
			.map(|tx| -> ProviderResult<TxDescriptor> {
				Ok(TxDescriptor {
					to: tx.to,
					data: tx.data,
					value: match tx.value.as_deref() {
						Some(value) => parse_amount(Some(value), "transaction.value")?,
						None => Amount::zero(),
					},
				})
			})
			.transpose()?;

		let fees = body
			.fees
			.into_iter()
			.map(|fee| -> ProviderResult<FeeItem> {
				Ok(FeeItem {
					amount: parse_amount(Some(&fee.amount), "fees.amount")?,
					name: fee.name,
					token: fee.token,
					amount_usd: None,
				})
			})
			.collect::<ProviderResult<Vec<_>>>()?;

		Ok(NormalizedQuote {
			quote_id: uuid::Uuid::new_v4().to_string(),
			provider: ProviderKind::DirectSwap,
			output_amount,
			min_output_amount,
			approval_target: body.allowance_target,
			transaction,
			fees,
			estimated_duration_secs: None,
		})
	}

	/// Allowance spender for the chain; errors are logged and dropped
	async fn fetch_spender(&self, request: &QuoteRequest, timeout: Duration) -> Option<String> {
		if request.src_token.is_native() {
			return None;
		}
		if let Some(spender) = self.spenders.get(&request.src_chain_id) {
			return Some(spender.value().clone());
		}

		let chain_id = request.src_chain_id.to_string();
		let lookup = async {
			let response = self
				.endpoints
				.send(&self.config, SPENDER_PATH, |url| {
					self.client.get(url).query(&[("chainId", chain_id.as_str())])
				})
				.await
				.map_err(|e| send_failure(ProviderKind::DirectSwap, e, timeout))?;
			decode_response::<SpenderResponse>(ProviderKind::DirectSwap, response)
		};

		match tokio::time::timeout(timeout, lookup).await {
			Ok(Ok((spender, _))) if !spender.address.trim().is_empty() => {
				self.spenders
					.insert(request.src_chain_id, spender.address.clone());
				Some(spender.address)
			},
			Ok(Ok(_)) => {
				debug!("Spender lookup for chain {} returned an empty address", chain_id);
				None
			},
			Ok(Err(e)) => {
				debug!("Spender lookup for chain {} failed: {}", chain_id, e);
				None
			},
			Err(_) => {
				debug!(
					"Spender lookup for chain {} timed out after {}ms",
					chain_id,
					millis(timeout)
				);
				None
			},
		}
	}
}

fn parse_amount(value: Option<&str>, field: &str) -> ProviderResult<Amount> {
	let value = value.ok_or_else(|| {
		ProviderFailure::decode(ProviderKind::DirectSwap, format!("missing field `{}`", field))
	})?;
	value.parse::<Amount>().map_err(|e| {
		ProviderFailure::decode(ProviderKind::DirectSwap, format!("{}: {}", field, e))
	})
}

#[async_trait]
impl QuoteProvider for DirectSwapAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn default_timeout(&self) -> Duration {
		Duration::from_millis(self.config.timeout_ms)
	}

	fn supports_cross_chain(&self) -> bool {
		false
	}

	fn classification_rules(&self) -> &ClassificationRules {
		&self.rules
	}

	async fn quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote> {
		if request.is_cross_chain() {
			return Err(ProviderFailure::unsupported(
				ProviderKind::DirectSwap,
				format!(
					"direct swap cannot route chain {} to chain {}",
					request.src_chain_id, request.dst_chain_id
				),
			));
		}

		debug!(
			"Direct-swap quote request for {} amount {} (timeout {}ms)",
			request.pair_label(),
			request.amount,
			millis(timeout)
		);

		let spender_timeout = self.spender_timeout.min(timeout);
		let (quote, spender) = tokio::join!(
			tokio::time::timeout(timeout, self.fetch_quote(request, timeout)),
			self.fetch_spender(request, spender_timeout),
		);

		let mut quote = match quote {
			Ok(result) => result?,
			Err(_) => {
				return Err(ProviderFailure::deadline_exceeded(
					ProviderKind::DirectSwap,
					millis(timeout),
				))
			},
		};

		if let Some(spender) = spender {
			quote.approval_target = Some(spender);
		}
		Ok(quote)
	}
}
