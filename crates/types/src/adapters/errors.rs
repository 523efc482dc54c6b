//! Provider failure carried from adapters to the classifier

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::ProviderKind;

/// How a provider call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
	/// Provider answered with a non-success HTTP status
	Rejected { status: u16 },
	/// The adapter's own deadline elapsed; no provider status exists
	DeadlineExceeded { timeout_ms: u64 },
	/// Connection-level error before a response arrived
	Transport,
	/// Success status but the body did not match the provider schema
	Decode,
	/// Provider returned a quote with zero output
	EmptyQuote,
	/// The adapter cannot serve this request shape
	Unsupported,
}

impl fmt::Display for FailureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FailureKind::Rejected { status } => write!(f, "HTTP {}", status),
			FailureKind::DeadlineExceeded { timeout_ms } => {
				write!(f, "deadline exceeded after {}ms", timeout_ms)
			},
			FailureKind::Transport => f.write_str("transport error"),
			FailureKind::Decode => f.write_str("malformed response"),
			FailureKind::EmptyQuote => f.write_str("empty quote"),
			FailureKind::Unsupported => f.write_str("unsupported request"),
		}
	}
}

/// Failure returned by a provider adapter
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} quote failed ({kind}): {text}")]
pub struct ProviderFailure {
	pub provider: ProviderKind,
	pub kind: FailureKind,
	/// Structured error body, when the provider sent JSON
	pub payload: Option<Value>,
	/// Raw response text or local error description
	pub text: String,
}

impl ProviderFailure {
	pub fn new(provider: ProviderKind, kind: FailureKind, text: impl Into<String>) -> Self {
		Self {
			provider,
			kind,
			payload: None,
			text: text.into(),
		}
	}

	/// Remote rejection; the body is kept raw and parsed as JSON when possible
	pub fn rejected(provider: ProviderKind, status: u16, body: impl Into<String>) -> Self {
		let text = body.into();
		let payload = serde_json::from_str::<Value>(&text)
			.ok()
			.filter(|value| value.is_object());
		Self {
			provider,
			kind: FailureKind::Rejected { status },
			payload,
			text,
		}
	}

	pub fn deadline_exceeded(provider: ProviderKind, timeout_ms: u64) -> Self {
		Self::new(
			provider,
			FailureKind::DeadlineExceeded { timeout_ms },
			format!("request timed out after {}ms", timeout_ms),
		)
	}

	pub fn transport(provider: ProviderKind, error: impl fmt::Display) -> Self {
		Self::new(provider, FailureKind::Transport, error.to_string())
	}

	pub fn decode(provider: ProviderKind, error: impl fmt::Display) -> Self {
		Self::new(provider, FailureKind::Decode, error.to_string())
	}

	pub fn empty_quote(provider: ProviderKind) -> Self {
		Self::new(provider, FailureKind::EmptyQuote, "quote returned zero output")
	}

	pub fn unsupported(provider: ProviderKind, reason: impl Into<String>) -> Self {
		Self::new(provider, FailureKind::Unsupported, reason)
	}

	pub fn with_payload(mut self, payload: Value) -> Self {
		self.payload = Some(payload);
		self
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self.kind, FailureKind::DeadlineExceeded { .. })
	}

	pub fn status(&self) -> Option<u16> {
		match self.kind {
			FailureKind::Rejected { status } => Some(status),
			_ => None,
		}
	}

	/// Human-readable summary extracted from the structured payload
	pub fn summary(&self) -> Option<String> {
		let payload = self.payload.as_ref()?;
		["message", "description", "reason", "error", "detail"]
			.iter()
			.filter_map(|field| payload.get(*field))
			.find_map(|value| match value {
				Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
				Value::Object(inner) => inner
					.get("message")
					.and_then(Value::as_str)
					.map(str::to_string),
				_ => None,
			})
	}

	/// Raw text and payload summary joined for pattern matching
	pub fn combined_text(&self) -> String {
		match self.summary() {
			Some(summary) if !self.text.contains(&summary) => {
				format!("{} | {}", self.text, summary)
			},
			_ => self.text.clone(),
		}
	}

	/// Ranking used to pick the more useful of two failures
	///
	/// A structured payload outranks none; then client-class statuses
	/// outrank server-class ones.
	pub fn informativeness(&self) -> (bool, u8) {
		let status_rank = match self.status() {
			Some(status) if (400..500).contains(&status) => 2,
			Some(status) if (500..600).contains(&status) => 1,
			_ => 0,
		};
		(self.payload.is_some(), status_rank)
	}
}
