//! HTTP client cache for provider connections
//!
//! One pooled `reqwest::Client` per provider configuration, reused across
//! quote calls and refreshed after a TTL.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use qr_types::{ProviderRuntimeConfig, SecretString};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::AdapterError;

/// Configuration a pooled client is built from (and cached by)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientConfig {
	pub base_url: String,
	pub provider_id: String,
	pub max_idle_per_host: usize,
	pub keep_alive_timeout_ms: u64,
	pub headers: Vec<(String, String)>,
}

impl From<&ProviderRuntimeConfig> for ClientConfig {
	fn from(config: &ProviderRuntimeConfig) -> Self {
		let mut headers = vec![
			("User-Agent".to_string(), "quote-router/0.1".to_string()),
			("Accept".to_string(), "application/json".to_string()),
		];

		if let Some(extra) = &config.headers {
			let mut extra: Vec<_> = extra.iter().collect();
			extra.sort();
			for (key, value) in extra {
				headers.push((key.clone(), value.clone()));
			}
		}

		Self {
			base_url: config.endpoint.clone(),
			provider_id: config.provider_id.clone(),
			max_idle_per_host: 10,
			keep_alive_timeout_ms: 90_000,
			headers,
		}
	}
}

/// Provider authentication applied as a default header
#[derive(Debug, Clone)]
pub enum AuthConfig {
	None,
	ApiKey { header: String, key: SecretString },
}

impl AuthConfig {
	pub fn api_key(header: &str, key: SecretString) -> Self {
		Self::ApiKey {
			header: header.to_string(),
			key,
		}
	}
}

#[derive(Debug, Clone)]
struct CachedClient {
	client: Arc<Client>,
	created_at: Instant,
}

impl CachedClient {
	fn new(client: Client) -> Self {
		Self {
			client: Arc::new(client),
			created_at: Instant::now(),
		}
	}

	fn is_expired(&self, ttl: Duration) -> bool {
		self.created_at.elapsed() > ttl
	}
}

/// Thread-safe cache of pooled HTTP clients with TTL
#[derive(Clone, Debug)]
pub struct ClientCache {
	clients: Arc<DashMap<ClientConfig, CachedClient>>,
	ttl: Duration,
}

impl ClientCache {
	/// Cache with the default 30-minute client lifetime
	pub fn new() -> Self {
		Self::with_ttl(Duration::from_secs(30 * 60))
	}

	pub fn with_ttl(ttl: Duration) -> Self {
		Self {
			clients: Arc::new(DashMap::new()),
			ttl,
		}
	}

	/// Shared process-wide cache used by adapters built with defaults
	pub fn for_adapter() -> Self {
		GLOBAL_CLIENT_CACHE.clone()
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Get or create a client for the given configuration
	pub fn get_client(&self, config: &ClientConfig) -> Result<Arc<Client>, AdapterError> {
		self.clients.remove_if(config, |_, cached| {
			let expired = cached.is_expired(self.ttl);
			if expired {
				warn!(
					"Client cache expired for {} (age: {:?}), will create new client",
					config.base_url,
					cached.created_at.elapsed()
				);
			}
			expired
		});

		if let Some(cached) = self.clients.get(config) {
			return Ok(cached.client.clone());
		}

		debug!("Creating new pooled client for {}", config.base_url);
		let cached = CachedClient::new(Self::build_client(config)?);
		let client = cached.client.clone();

		match self.clients.entry(config.clone()) {
			Entry::Occupied(entry) => Ok(entry.get().client.clone()),
			Entry::Vacant(entry) => {
				entry.insert(cached);
				Ok(client)
			},
		}
	}

	/// Get or create a client that sends the provider's credentials
	pub fn get_client_with_auth(
		&self,
		provider_config: &ProviderRuntimeConfig,
		auth: &AuthConfig,
	) -> Result<Arc<Client>, AdapterError> {
		let mut config = ClientConfig::from(provider_config);
		if let AuthConfig::ApiKey { header, key } = auth {
			config
				.headers
				.push((header.clone(), key.expose_secret().to_string()));
		}
		self.get_client(&config)
	}

	fn build_client(config: &ClientConfig) -> Result<Client, AdapterError> {
		let mut header_map = reqwest::header::HeaderMap::new();
		for (key, value) in &config.headers {
			if let (Ok(name), Ok(value)) = (
				reqwest::header::HeaderName::from_bytes(key.as_bytes()),
				reqwest::header::HeaderValue::from_str(value),
			) {
				header_map.insert(name, value);
			}
		}

		ClientBuilder::new()
			.pool_max_idle_per_host(config.max_idle_per_host)
			.pool_idle_timeout(Duration::from_millis(config.keep_alive_timeout_ms))
			.tcp_keepalive(Duration::from_secs(60))
			.default_headers(header_map)
			.build()
			.map_err(AdapterError::HttpClient)
	}
}

impl Default for ClientCache {
	fn default() -> Self {
		Self::new()
	}
}

lazy_static::lazy_static! {
	static ref GLOBAL_CLIENT_CACHE: ClientCache = ClientCache::new();
}
