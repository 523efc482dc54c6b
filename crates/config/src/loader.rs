//! Configuration loading utilities

use crate::settings::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File, FileFormat};

/// Environment variables overriding file settings, e.g. `QUOTE_ROUTER__SERVER__PORT`
pub const ENV_PREFIX: &str = "QUOTE_ROUTER";

const DEFAULT_CONFIG_PATH: &str = "config/config";

const LIST_KEYS: &[&str] = &[
	"providers.direct_swap.path_prefixes",
	"providers.bridge_swap.path_prefixes",
	"probe.usd_targets",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
	#[error("Failed to load configuration: {0}")]
	Load(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Invalid(#[from] ConfigValidationError),
}

fn environment() -> Environment {
	LIST_KEYS.iter().fold(
		Environment::with_prefix(ENV_PREFIX)
			.prefix_separator("__")
			.separator("__")
			.try_parsing(true)
			.list_separator(","),
		|env, key| env.with_list_parse_key(key),
	)
}

/// Load `config/config.{toml,json,yaml}` (or `$CONFIG_PATH`), overlay the
/// environment and validate
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
	let settings: Settings = Config::builder()
		.add_source(File::with_name(&path).required(false))
		.add_source(environment())
		.build()?
		.try_deserialize()?;

	settings.validate()?;
	Ok(settings)
}

/// Load settings from an inline TOML document (no environment overlay)
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigLoadError> {
	let settings: Settings = Config::builder()
		.add_source(File::from_str(toml, FileFormat::Toml))
		.build()?
		.try_deserialize()?;

	settings.validate()?;
	Ok(settings)
}
