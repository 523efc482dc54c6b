//! Quote Router Library
//!
//! Aggregates quotes from a same-chain direct-swap provider and a
//! cross-chain bridge provider, and turns opaque provider failures into a
//! classified contract with a minimum-amount hint when one can be found.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

// Core domain types
pub use qr_types::{
	serde_json, Amount, ErrorReason, MinAmountHint, NormalizedQuote, ProviderFailure,
	ProviderKind, QuoteFailure, QuoteProvider, QuoteRequest, RouteMode, TokenDescriptor,
};

// Service layer
pub use qr_service::{
	OrchestratorConfig, ProbeConfig, QuoteOrchestrator, QuoteOrchestratorTrait, QuoteServiceError,
	ResolverConfig,
};

// Storage layer
pub use qr_storage::{MemoryCache, QuoteCache};

// API layer
pub use qr_api::{create_router, AppState};

// Adapters
pub use qr_adapters::{
	AdapterError, AuthConfig, BridgeSwapAdapter, ClientCache, DirectSwapAdapter, ProviderRegistry,
};

// Config
pub use qr_config::{load_config, log_service_info, log_startup_complete, Settings};

pub mod models {
	pub use qr_types::*;
}

pub mod storage {
	pub use qr_storage::*;
}

pub mod config {
	pub use qr_config::*;
}

pub mod adapters {
	pub use qr_adapters::*;
}

pub mod api {
	pub use qr_api::*;
}

pub mod service {
	pub use qr_service::*;
}

pub use async_trait;
pub use reqwest;

/// Builder for configuring the quote router
pub struct QuoteRouterBuilder {
	settings: Option<Settings>,
	cache: Option<Arc<dyn QuoteCache>>,
	providers: Vec<Arc<dyn QuoteProvider>>,
}

impl Default for QuoteRouterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl QuoteRouterBuilder {
	pub fn new() -> Self {
		Self {
			settings: None,
			cache: None,
			providers: Vec::new(),
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Use a custom cache backend instead of the in-memory one
	pub fn with_cache(mut self, cache: Arc<dyn QuoteCache>) -> Self {
		self.cache = Some(cache);
		self
	}

	/// Register a provider adapter; it replaces the configured adapter of the same kind
	pub fn with_provider(mut self, provider: Arc<dyn QuoteProvider>) -> Self {
		self.providers.push(provider);
		self
	}

	fn build_registry(
		&self,
		settings: &Settings,
	) -> Result<ProviderRegistry, Box<dyn std::error::Error>> {
		let mut registry = ProviderRegistry::new();
		let clients = ClientCache::for_adapter();

		let direct = &settings.providers.direct_swap;
		if direct.enabled && !self.overrides(ProviderKind::DirectSwap) {
			let auth = provider_auth(direct)?;
			let adapter = DirectSwapAdapter::with_cache(
				direct.runtime_config("direct-swap"),
				clients.clone(),
				auth,
			)?;
			registry.register(Arc::new(adapter));
		}

		let bridge = &settings.providers.bridge_swap;
		if bridge.enabled && !self.overrides(ProviderKind::BridgeSwap) {
			let auth = provider_auth(bridge)?;
			let adapter =
				BridgeSwapAdapter::with_cache(bridge.runtime_config("bridge-swap"), clients, auth)?;
			registry.register(Arc::new(adapter));
		}

		for provider in &self.providers {
			if let Some(previous) = registry.register(Arc::clone(provider)) {
				info!("Replaced {} provider adapter", previous.kind());
			}
		}

		Ok(registry)
	}

	fn overrides(&self, kind: ProviderKind) -> bool {
		self.providers.iter().any(|p| p.kind() == kind)
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		use qr_config::LogFormat;

		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
				} else {
					subscriber.try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
				} else {
					subscriber.try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
				} else {
					subscriber.try_init().map_err(|e| e as Box<dyn std::error::Error>)?;
				}
			},
		}

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);

		Ok(())
	}

	/// Build the orchestrator and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();
		settings
			.validate()
			.map_err(|e| format!("Invalid configuration: {}", e))?;

		let registry = self.build_registry(&settings)?;
		if registry.is_empty() {
			return Err("No provider adapters configured".into());
		}
		info!(
			"Successfully initialized with {} provider(s): {:?}",
			registry.len(),
			registry.kinds()
		);

		let cache = self
			.cache
			.clone()
			.unwrap_or_else(|| Arc::new(MemoryCache::<qr_types::CacheValue>::new()));

		let orchestrator = QuoteOrchestrator::with_configs(
			registry,
			cache,
			orchestrator_config(&settings),
			probe_config(&settings),
			resolver_config(&settings),
		);

		let app_state = AppState::new(Arc::new(orchestrator) as Arc<dyn QuoteOrchestratorTrait>);
		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server with all defaults and setup
	///
	/// Loads `.env`, reads configuration unless settings were provided,
	/// initializes tracing, then binds and serves until ctrl-c.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		self.init_tracing_from_settings(&settings)?;
		log_service_info();

		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file and environment"
			}
		);
		qr_config::log_provider_summary(&settings);

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;

		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /api/v1/quote");

		axum::serve(listener, app)
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		qr_config::log_service_shutdown();
		Ok(())
	}
}

fn provider_auth(
	settings: &qr_config::ProviderSettings,
) -> Result<AuthConfig, Box<dyn std::error::Error>> {
	match settings.api_key_secret()? {
		Some(key) => Ok(AuthConfig::api_key(&settings.api_key_header, key)),
		None => Ok(AuthConfig::None),
	}
}

pub fn orchestrator_config(settings: &Settings) -> OrchestratorConfig {
	OrchestratorConfig {
		global_timeout: settings.global_timeout(),
	}
}

pub fn probe_config(settings: &Settings) -> ProbeConfig {
	ProbeConfig {
		usd_threshold: settings.probe.usd_threshold,
		multiplier: settings.probe.multiplier,
		usd_targets: settings.probe.usd_targets.clone(),
		timeout: settings.probe_timeout(),
		verdict_ttl: settings.verdict_ttl(),
	}
}

pub fn resolver_config(settings: &Settings) -> ResolverConfig {
	ResolverConfig {
		exponential_steps: settings.resolver.exponential_steps,
		binary_iterations: settings.resolver.binary_iterations,
		trial_timeout: settings.trial_timeout(),
		hint_ttl: settings.hint_ttl(),
	}
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::warn!("Failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
	info!("Shutdown signal received");
}
