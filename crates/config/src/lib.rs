//! Quote Router Configuration
//!
//! Configuration management and startup utilities for the quote router.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from_str, ConfigLoadError, ENV_PREFIX};
pub use settings::{
	CacheSettings, ConfigValidationError, LogFormat, LoggingSettings, OrchestratorSettings,
	ProbeSettings, ProviderSettings, ProvidersSettings, ResolverSettings, ServerSettings, Settings,
};
pub use startup_logger::{
	log_provider_summary, log_service_info, log_service_shutdown, log_startup_complete,
};
