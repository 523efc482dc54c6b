//! API mount-point resolution
//!
//! Some providers serve the same API under more than one path prefix. The
//! configured prefixes are tried in order; a bare 404 moves on to the next
//! one. A 404 carrying a JSON object is the provider's own answer and counts
//! as resolved. The resolved prefix is remembered per endpoint for the rest
//! of the process lifetime.

use dashmap::DashMap;
use qr_types::ProviderRuntimeConfig;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Provider response with its body read in full
#[derive(Debug, Clone)]
pub struct ProviderResponse {
	pub status: StatusCode,
	pub body: String,
}

impl ProviderResponse {
	pub async fn read(response: Response) -> Result<Self, reqwest::Error> {
		let status = response.status();
		let body = response.text().await?;
		Ok(Self { status, body })
	}

	/// 404 from a router rather than from the provider's API
	fn is_bare_not_found(&self) -> bool {
		if self.status != StatusCode::NOT_FOUND {
			return false;
		}
		!matches!(
			serde_json::from_str::<Value>(&self.body),
			Ok(Value::Object(fields)) if !fields.is_empty()
		)
	}
}

#[derive(Debug, Clone, Default)]
pub struct EndpointResolver {
	resolved: Arc<DashMap<String, String>>,
}

impl EndpointResolver {
	pub fn new() -> Self {
		Self::default()
	}

	fn cache_key(config: &ProviderRuntimeConfig, path: &str) -> String {
		format!("{}|{}", config.endpoint.trim_end_matches('/'), path)
	}

	/// Join base URL, prefix and path with exactly one slash between parts
	pub fn join(base: &str, prefix: &str, path: &str) -> String {
		let base = base.trim_end_matches('/');
		let prefix = prefix.trim_matches('/');
		let path = path.trim_start_matches('/');
		if prefix.is_empty() {
			format!("{}/{}", base, path)
		} else {
			format!("{}/{}/{}", base, prefix, path)
		}
	}

	/// Prefix already known to work for this endpoint, if any
	pub fn resolved_prefix(&self, config: &ProviderRuntimeConfig, path: &str) -> Option<String> {
		self.resolved
			.get(&Self::cache_key(config, path))
			.map(|entry| entry.value().clone())
	}

	/// Send a request built by `build` for each candidate URL until one is not a bare 404
	pub async fn send<F>(
		&self,
		config: &ProviderRuntimeConfig,
		path: &str,
		build: F,
	) -> Result<ProviderResponse, reqwest::Error>
	where
		F: Fn(&str) -> RequestBuilder,
	{
		if let Some(prefix) = self.resolved_prefix(config, path) {
			let url = Self::join(&config.endpoint, &prefix, path);
			return ProviderResponse::read(build(&url).send().await?).await;
		}

		let candidates: Vec<&str> = if config.path_prefixes.is_empty() {
			vec![""]
		} else {
			config.path_prefixes.iter().map(String::as_str).collect()
		};

		if candidates.len() == 1 {
			let url = Self::join(&config.endpoint, candidates[0], path);
			return ProviderResponse::read(build(&url).send().await?).await;
		}

		let mut last_response = None;
		for prefix in candidates {
			let url = Self::join(&config.endpoint, prefix, path);
			let response = ProviderResponse::read(build(&url).send().await?).await?;

			if response.is_bare_not_found() {
				debug!(
					"{} not found under prefix '{}', trying next candidate",
					path, prefix
				);
				last_response = Some(response);
				continue;
			}

			info!(
				"Resolved API prefix '{}' for {}{}",
				prefix, config.endpoint, path
			);
			self.resolved
				.insert(Self::cache_key(config, path), prefix.to_string());
			return Ok(response);
		}

		Ok(last_response.unwrap_or(ProviderResponse {
			status: StatusCode::NOT_FOUND,
			body: String::new(),
		}))
	}
}
