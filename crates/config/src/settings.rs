//! Configuration settings structures

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};
use qr_types::{ProviderRuntimeConfig, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub providers: ProvidersSettings,
	pub orchestrator: OrchestratorSettings,
	pub probe: ProbeSettings,
	pub resolver: ResolverSettings,
	pub cache: CacheSettings,
	pub logging: LoggingSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 3000,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProvidersSettings {
	pub direct_swap: ProviderSettings,
	pub bridge_swap: ProviderSettings,
}

impl Default for ProvidersSettings {
	fn default() -> Self {
		Self {
			direct_swap: ProviderSettings {
				endpoint: "https://direct-swap.example.com".to_string(),
				path_prefixes: vec!["/swap/allowance-holder".to_string(), "/swap/v1".to_string()],
				timeout_ms: 3_000,
				..ProviderSettings::default()
			},
			bridge_swap: ProviderSettings {
				endpoint: "https://bridge-swap.example.com".to_string(),
				path_prefixes: vec!["/v1".to_string()],
				timeout_ms: 5_000,
				..ProviderSettings::default()
			},
		}
	}
}

/// Connection settings for one provider
///
/// A single `path_prefixes` entry is used as-is. With several, the first
/// one that answers with anything but a bare 404 is remembered for the
/// process lifetime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
	pub enabled: bool,
	pub endpoint: String,
	pub path_prefixes: Vec<String>,
	pub timeout_ms: u64,
	pub api_key: Option<ConfigurableValue>,
	pub api_key_header: String,
	pub headers: Option<HashMap<String, String>>,
}

impl Default for ProviderSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			endpoint: String::new(),
			path_prefixes: vec![String::new()],
			timeout_ms: 3_000,
			api_key: None,
			api_key_header: "x-api-key".to_string(),
			headers: None,
		}
	}
}

impl ProviderSettings {
	pub fn runtime_config(&self, provider_id: &str) -> ProviderRuntimeConfig {
		let config = ProviderRuntimeConfig::new(provider_id, self.endpoint.clone(), self.timeout_ms)
			.with_prefixes(self.path_prefixes.clone());
		match &self.headers {
			Some(headers) => config.with_headers(headers.clone()),
			None => config,
		}
	}

	pub fn api_key_secret(&self) -> Result<Option<SecretString>, ConfigurableValueError> {
		self.api_key
			.as_ref()
			.map(ConfigurableValue::resolve_secret)
			.transpose()
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OrchestratorSettings {
	/// Overall per-request deadline; derived from the stage budgets when absent
	pub global_timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProbeSettings {
	pub usd_threshold: f64,
	pub multiplier: u64,
	pub usd_targets: Vec<f64>,
	pub timeout_ms: u64,
}

impl Default for ProbeSettings {
	fn default() -> Self {
		Self {
			usd_threshold: 50.0,
			multiplier: 200,
			usd_targets: vec![10.0, 30.0],
			timeout_ms: 2_500,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ResolverSettings {
	pub exponential_steps: u32,
	pub binary_iterations: u32,
	pub trial_timeout_ms: u64,
	pub hint_ttl_secs: u64,
}

impl Default for ResolverSettings {
	fn default() -> Self {
		Self {
			exponential_steps: 8,
			binary_iterations: 6,
			trial_timeout_ms: 2_500,
			hint_ttl_secs: 300,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheSettings {
	pub verdict_ttl_secs: u64,
}

impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			verdict_ttl_secs: 120,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
	#[error("{field} must be greater than zero")]
	Zero { field: String },

	#[error("{field} must not be empty")]
	Empty { field: String },

	#[error("{field} must be a positive number, got {value}")]
	NotPositive { field: String, value: f64 },

	#[error("probe.usd_targets must be strictly increasing")]
	UnorderedTargets,

	#[error("Invalid endpoint for {field}: {reason}")]
	InvalidEndpoint { field: String, reason: String },
}

impl Settings {
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	pub fn probe_timeout(&self) -> Duration {
		Duration::from_millis(self.probe.timeout_ms)
	}

	pub fn trial_timeout(&self) -> Duration {
		Duration::from_millis(self.resolver.trial_timeout_ms)
	}

	pub fn hint_ttl(&self) -> Duration {
		Duration::from_secs(self.resolver.hint_ttl_secs)
	}

	pub fn verdict_ttl(&self) -> Duration {
		Duration::from_secs(self.cache.verdict_ttl_secs)
	}

	pub fn global_timeout(&self) -> Option<Duration> {
		self.orchestrator.global_timeout_ms.map(Duration::from_millis)
	}

	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		for (name, provider) in [
			("providers.direct_swap", &self.providers.direct_swap),
			("providers.bridge_swap", &self.providers.bridge_swap),
		] {
			if !provider.enabled {
				continue;
			}
			let parsed = url::Url::parse(&provider.endpoint).map_err(|e| {
				ConfigValidationError::InvalidEndpoint {
					field: format!("{}.endpoint", name),
					reason: e.to_string(),
				}
			})?;
			if !matches!(parsed.scheme(), "http" | "https") {
				return Err(ConfigValidationError::InvalidEndpoint {
					field: format!("{}.endpoint", name),
					reason: format!("unsupported scheme '{}'", parsed.scheme()),
				});
			}
			if provider.path_prefixes.is_empty() {
				return Err(ConfigValidationError::Empty {
					field: format!("{}.path_prefixes", name),
				});
			}
			require_nonzero(&format!("{}.timeout_ms", name), provider.timeout_ms)?;
		}

		if self.orchestrator.global_timeout_ms == Some(0) {
			return Err(ConfigValidationError::Zero {
				field: "orchestrator.global_timeout_ms".to_string(),
			});
		}

		require_positive("probe.usd_threshold", self.probe.usd_threshold)?;
		require_nonzero("probe.multiplier", self.probe.multiplier)?;
		require_nonzero("probe.timeout_ms", self.probe.timeout_ms)?;
		if self.probe.usd_targets.is_empty() {
			return Err(ConfigValidationError::Empty {
				field: "probe.usd_targets".to_string(),
			});
		}
		for target in &self.probe.usd_targets {
			require_positive("probe.usd_targets", *target)?;
		}
		if self.probe.usd_targets.windows(2).any(|pair| pair[0] >= pair[1]) {
			return Err(ConfigValidationError::UnorderedTargets);
		}

		require_nonzero(
			"resolver.exponential_steps",
			self.resolver.exponential_steps.into(),
		)?;
		require_nonzero("resolver.trial_timeout_ms", self.resolver.trial_timeout_ms)?;
		require_nonzero("resolver.hint_ttl_secs", self.resolver.hint_ttl_secs)?;
		require_nonzero("cache.verdict_ttl_secs", self.cache.verdict_ttl_secs)?;

		Ok(())
	}
}

fn require_nonzero(field: &str, value: u64) -> Result<(), ConfigValidationError> {
	if value == 0 {
		return Err(ConfigValidationError::Zero {
			field: field.to_string(),
		});
	}
	Ok(())
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigValidationError> {
	if !(value.is_finite() && value > 0.0) {
		return Err(ConfigValidationError::NotPositive {
			field: field.to_string(),
			value,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.bind_address(), "0.0.0.0:3000");
		assert_eq!(settings.probe.usd_targets, vec![10.0, 30.0]);
		assert_eq!(settings.resolver.exponential_steps, 8);
		assert_eq!(settings.resolver.binary_iterations, 6);
		assert_eq!(settings.hint_ttl(), Duration::from_secs(300));
		assert!(settings.global_timeout().is_none());
	}

	#[test]
	fn test_rejects_unordered_targets() {
		let mut settings = Settings::default();
		settings.probe.usd_targets = vec![30.0, 10.0];
		assert_eq!(
			settings.validate(),
			Err(ConfigValidationError::UnorderedTargets)
		);
	}

	#[test]
	fn test_rejects_zero_timeouts() {
		let mut settings = Settings::default();
		settings.providers.bridge_swap.timeout_ms = 0;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::Zero { field }) if field == "providers.bridge_swap.timeout_ms"
		));

		let mut settings = Settings::default();
		settings.orchestrator.global_timeout_ms = Some(0);
		assert!(settings.validate().is_err());
	}

	#[test]
	fn test_disabled_provider_is_not_validated() {
		let mut settings = Settings::default();
		settings.providers.direct_swap.enabled = false;
		settings.providers.direct_swap.endpoint = String::new();
		assert!(settings.validate().is_ok());

		settings.providers.direct_swap.enabled = true;
		assert!(matches!(
			settings.validate(),
			Err(ConfigValidationError::InvalidEndpoint { .. })
		));
	}

	#[test]
	fn test_runtime_config() {
		let mut settings = ProviderSettings {
			endpoint: "https://bridge.example".to_string(),
			path_prefixes: vec!["/v1".to_string()],
			timeout_ms: 4_000,
			..ProviderSettings::default()
		};
		let runtime = settings.runtime_config("bridge-swap");
		assert_eq!(runtime.provider_id, "bridge-swap");
		assert_eq!(runtime.path_prefixes, vec!["/v1".to_string()]);
		assert_eq!(runtime.timeout_ms, 4_000);

		assert!(settings.api_key_secret().unwrap().is_none());
		settings.api_key = Some(ConfigurableValue::from_plain("k"));
		assert_eq!(
			settings.api_key_secret().unwrap().unwrap().expose_secret(),
			"k"
		);
	}
}
