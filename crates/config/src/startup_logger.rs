//! Service startup logging for the quote router

use crate::Settings;
use std::env;
use tracing::{info, warn};

/// Logs service information at startup
pub fn log_service_info() {
	// Root package identity, not this crate's
	let service_name = "quote-router";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Quote Router Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	}

	if let Ok(config_path) = env::var("CONFIG_PATH") {
		info!("📋 Config Path: {}", config_path);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the configured providers and engine budgets
pub fn log_provider_summary(settings: &Settings) {
	for (name, provider) in [
		("direct-swap", &settings.providers.direct_swap),
		("bridge-swap", &settings.providers.bridge_swap),
	] {
		if !provider.enabled {
			info!("⏸️ Provider {} disabled", name);
			continue;
		}
		info!(
			"🔌 Provider {}: {} prefixes {:?} timeout {}ms",
			name, provider.endpoint, provider.path_prefixes, provider.timeout_ms
		);
		if let Some(api_key) = &provider.api_key {
			if api_key.is_insecure_default() {
				warn!("⚠️ Provider {} uses an insecure default API key", name);
			} else {
				info!("🔑 Provider {} API key from {}", name, api_key.description());
			}
		}
	}

	info!(
		"🧪 Probe: below ${} with targets {:?}, resolver: {} steps / {} iterations",
		settings.probe.usd_threshold,
		settings.probe.usd_targets,
		settings.resolver.exponential_steps,
		settings.resolver.binary_iterations
	);
}

pub fn log_service_shutdown() {
	info!("🛑 Quote Router Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

pub fn log_startup_complete(bind_address: &str) {
	info!("✅ Quote Router Service Started Successfully");
	info!("🌐 Server listening on: {}", bind_address);
	info!("📡 Ready to accept requests");
}
