//! Response handling shared by the HTTP adapters

use qr_types::{ProviderFailure, ProviderKind, ProviderResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::endpoint::ProviderResponse;

pub(crate) fn millis(timeout: Duration) -> u64 {
	timeout.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Map a reqwest send error, keeping client-side timeouts distinguishable
pub(crate) fn send_failure(
	provider: ProviderKind,
	error: reqwest::Error,
	timeout: Duration,
) -> ProviderFailure {
	if error.is_timeout() {
		ProviderFailure::deadline_exceeded(provider, millis(timeout))
	} else {
		ProviderFailure::transport(provider, error)
	}
}

/// Read a response body into the provider schema
///
/// Non-success statuses become `Rejected` with the raw body. A success body
/// that does not match `T` is a decode failure; the parsed JSON is returned
/// alongside the typed value so callers can attach it to later failures.
pub(crate) fn decode_response<T: DeserializeOwned>(
	provider: ProviderKind,
	response: ProviderResponse,
) -> ProviderResult<(T, Value)> {
	if !response.status.is_success() {
		return Err(ProviderFailure::rejected(
			provider,
			response.status.as_u16(),
			response.body,
		));
	}

	let value: Value =
		serde_json::from_str(&response.body).map_err(|e| ProviderFailure::decode(provider, e))?;
	let typed = T::deserialize(&value).map_err(|e| ProviderFailure::decode(provider, e))?;
	Ok((typed, value))
}
