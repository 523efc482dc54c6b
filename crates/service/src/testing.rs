//! Scripted providers shared by the service unit tests

use async_trait::async_trait;
use qr_types::{
	Amount, ClassificationRules, NormalizedQuote, ProviderFailure, ProviderInfo, ProviderKind,
	ProviderResult, QuoteProvider, QuoteRequest, RouteMode, TokenDescriptor,
};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Script = Arc<dyn Fn(&QuoteRequest) -> ProviderResult<NormalizedQuote> + Send + Sync>;

/// Provider whose answers come from a closure, with optional latency
#[derive(Clone)]
pub struct ScriptedProvider {
	info: ProviderInfo,
	rules: ClassificationRules,
	script: Script,
	delay: Option<Duration>,
	slow_from: Option<(Amount, Duration)>,
	calls: Arc<Mutex<Vec<Amount>>>,
}

impl fmt::Debug for ScriptedProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScriptedProvider")
			.field("info", &self.info)
			.field("delay", &self.delay)
			.finish()
	}
}

impl ScriptedProvider {
	pub fn new<F>(kind: ProviderKind, script: F) -> Self
	where
		F: Fn(&QuoteRequest) -> ProviderResult<NormalizedQuote> + Send + Sync + 'static,
	{
		Self {
			info: ProviderInfo::new(kind.as_str(), kind, kind.as_str(), "test"),
			rules: ClassificationRules::new(),
			script: Arc::new(script),
			delay: None,
			slow_from: None,
			calls: Arc::new(Mutex::new(Vec::new())),
		}
	}

	/// Accepts amounts `>= min`, rejects smaller ones with `message`
	pub fn threshold(kind: ProviderKind, min: u64, message: &'static str) -> Self {
		let min = Amount::from(min);
		Self::new(kind, move |request| {
			if request.amount >= min {
				Ok(quote(kind, request.amount.clone()))
			} else {
				Err(ProviderFailure::rejected(
					kind,
					400,
					format!(r#"{{"message":"{}"}}"#, message),
				))
			}
		})
	}

	/// Always succeeds with a fixed output amount
	pub fn fixed(kind: ProviderKind, output: u64) -> Self {
		Self::new(kind, move |_| Ok(quote(kind, Amount::from(output))))
	}

	/// Always fails with the given failure
	pub fn failing(failure: ProviderFailure) -> Self {
		let kind = failure.provider;
		Self::new(kind, move |_| Err(failure.clone()))
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	/// Apply `delay` only to requests for at least `amount`
	pub fn with_delay_from(mut self, amount: u64, delay: Duration) -> Self {
		self.slow_from = Some((Amount::from(amount), delay));
		self
	}

	pub fn with_rules(mut self, rules: ClassificationRules) -> Self {
		self.rules = rules;
		self
	}

	pub fn calls(&self) -> Vec<Amount> {
		self.calls.lock().unwrap().clone()
	}
}

#[async_trait]
impl QuoteProvider for ScriptedProvider {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn default_timeout(&self) -> Duration {
		Duration::from_millis(500)
	}

	fn supports_cross_chain(&self) -> bool {
		self.info.kind == ProviderKind::BridgeSwap
	}

	fn classification_rules(&self) -> &ClassificationRules {
		&self.rules
	}

	async fn quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote> {
		self.calls.lock().unwrap().push(request.amount.clone());
		let delay = match &self.slow_from {
			Some((from, delay)) if request.amount >= *from => Some(*delay),
			_ => self.delay,
		};
		if let Some(delay) = delay {
			if delay >= timeout {
				tokio::time::sleep(timeout).await;
				return Err(ProviderFailure::deadline_exceeded(
					self.info.kind,
					timeout.as_millis() as u64,
				));
			}
			tokio::time::sleep(delay).await;
		}
		(self.script)(request)
	}
}

pub fn quote(kind: ProviderKind, output: Amount) -> NormalizedQuote {
	NormalizedQuote {
		quote_id: format!("{}-quote", kind),
		provider: kind,
		min_output_amount: output.less_bps(50),
		output_amount: output,
		approval_target: None,
		transaction: None,
		fees: Vec::new(),
		estimated_duration_secs: None,
	}
}

/// Same-chain request for `amount` raw units of a 6-decimal token
pub fn request(amount: u64, price_usd: Option<f64>) -> QuoteRequest {
	let mut src = TokenDescriptor::new("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6);
	src.price_usd = price_usd;
	QuoteRequest {
		route: RouteMode::Auto,
		src_chain_id: 1,
		dst_chain_id: 1,
		src_token: src,
		dst_token: TokenDescriptor::new("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
		amount: Amount::from(amount),
		sender: "0x1111111111111111111111111111111111111111".to_string(),
		recipient: None,
		slippage_percent: 0.5,
	}
}
