//! In-process provider adapters with controllable behaviour

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quote_router::models::{
	Amount, NormalizedQuote, ProviderFailure, ProviderInfo, ProviderKind, ProviderResult,
	QuoteProvider, QuoteRequest,
};

/// Call tracking for verifying which amounts a provider saw
#[derive(Debug, Clone, Default)]
pub struct CallTracker {
	amounts: Arc<Mutex<Vec<Amount>>>,
	completed: Arc<AtomicUsize>,
}

impl CallTracker {
	fn record_call(&self, amount: &Amount) {
		self.amounts.lock().unwrap().push(amount.clone());
	}

	fn record_completion(&self) {
		self.completed.fetch_add(1, Ordering::SeqCst);
	}

	pub fn call_count(&self) -> usize {
		self.amounts.lock().unwrap().len()
	}

	pub fn amounts(&self) -> Vec<Amount> {
		self.amounts.lock().unwrap().clone()
	}

	/// Calls that ran to the end of their delay
	pub fn completed(&self) -> usize {
		self.completed.load(Ordering::SeqCst)
	}
}

#[derive(Debug, Clone)]
enum Behaviour {
	/// Quote `output` (or the request amount) for amounts `>= min`
	Threshold {
		min: Amount,
		output: Option<Amount>,
		message: String,
	},
	/// Always reject with this status and body
	Reject { status: u16, body: String },
}

/// Provider that answers after a configurable delay
#[derive(Debug, Clone)]
pub struct TimingControlledProvider {
	info: ProviderInfo,
	behaviour: Behaviour,
	delay: Duration,
	/// Amounts below this answer without delay
	slow_from: Option<Amount>,
	timeout: Duration,
	pub tracker: CallTracker,
}

impl TimingControlledProvider {
	fn new(kind: ProviderKind, behaviour: Behaviour) -> Self {
		Self {
			info: ProviderInfo::new(format!("timing-{}", kind), kind, "Timing Controlled", "test"),
			behaviour,
			delay: Duration::from_millis(5),
			slow_from: None,
			timeout: Duration::from_millis(1_000),
			tracker: CallTracker::default(),
		}
	}

	/// Always quotes `output`
	pub fn fixed(kind: ProviderKind, output: u64) -> Self {
		Self::new(
			kind,
			Behaviour::Threshold {
				min: Amount::zero(),
				output: Some(Amount::from(output)),
				message: String::new(),
			},
		)
	}

	/// Quotes amounts `>= min` one-to-one and rejects smaller ones with `message`
	pub fn threshold(kind: ProviderKind, min: u64, message: &str) -> Self {
		Self::new(
			kind,
			Behaviour::Threshold {
				min: Amount::from(min),
				output: None,
				message: message.to_string(),
			},
		)
	}

	/// Rejects every request
	pub fn rejecting(kind: ProviderKind, status: u16, message: &str) -> Self {
		Self::new(
			kind,
			Behaviour::Reject {
				status,
				body: serde_json::json!({ "message": message }).to_string(),
			},
		)
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	/// Delay only requests of at least `amount`
	pub fn with_delay_from(mut self, amount: u64, delay: Duration) -> Self {
		self.slow_from = Some(Amount::from(amount));
		self.delay = delay;
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn shared(self) -> (Arc<dyn QuoteProvider>, CallTracker) {
		let tracker = self.tracker.clone();
		(Arc::new(self), tracker)
	}

	fn answer(&self, request: &QuoteRequest) -> ProviderResult<NormalizedQuote> {
		let kind = self.info.kind;
		match &self.behaviour {
			Behaviour::Threshold {
				min,
				output,
				message,
			} => {
				if request.amount < *min {
					return Err(ProviderFailure::rejected(
						kind,
						400,
						serde_json::json!({ "message": message }).to_string(),
					));
				}
				let output = output.clone().unwrap_or_else(|| request.amount.clone());
				Ok(NormalizedQuote {
					quote_id: format!("{}-{}", kind, request.amount),
					provider: kind,
					min_output_amount: output.less_bps(request.slippage_bps()),
					output_amount: output,
					approval_target: None,
					transaction: None,
					fees: Vec::new(),
					estimated_duration_secs: None,
				})
			},
			Behaviour::Reject { status, body } => {
				Err(ProviderFailure::rejected(kind, *status, body.clone()))
			},
		}
	}
}

#[async_trait]
impl QuoteProvider for TimingControlledProvider {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn default_timeout(&self) -> Duration {
		self.timeout
	}

	fn supports_cross_chain(&self) -> bool {
		self.info.kind == ProviderKind::BridgeSwap
	}

	async fn quote(
		&self,
		request: &QuoteRequest,
		timeout: Duration,
	) -> ProviderResult<NormalizedQuote> {
		self.tracker.record_call(&request.amount);
		let delayed = self
			.slow_from
			.as_ref()
			.map_or(true, |from| request.amount >= *from);
		let delay = if delayed { self.delay } else { Duration::ZERO };
		if delay >= timeout {
			tokio::time::sleep(timeout).await;
			return Err(ProviderFailure::deadline_exceeded(
				self.info.kind,
				timeout.as_millis() as u64,
			));
		}
		tokio::time::sleep(delay).await;
		self.tracker.record_completion();
		self.answer(request)
	}
}
