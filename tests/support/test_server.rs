//! Test server for integration tests

use std::sync::Arc;

use axum::Router;
use quote_router::{models::QuoteProvider, AppState, QuoteRouterBuilder, Settings};
use tokio::task::JoinHandle;

/// Settings with both HTTP providers disabled
pub fn offline_settings() -> Settings {
	let mut settings = Settings::default();
	settings.providers.direct_swap.enabled = false;
	settings.providers.bridge_swap.enabled = false;
	settings
}

/// Build the engine around in-process providers
pub async fn start_with(
	settings: Settings,
	providers: Vec<Arc<dyn QuoteProvider>>,
) -> (Router, AppState) {
	let builder = providers
		.into_iter()
		.fold(QuoteRouterBuilder::new().with_settings(settings), |builder, provider| {
			builder.with_provider(provider)
		});
	builder.start().await.expect("router starts")
}

/// Test server instance bound to an ephemeral port
pub struct TestServer {
	pub base_url: String,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	pub async fn spawn_with_providers(
		providers: Vec<Arc<dyn QuoteProvider>>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		Self::spawn_with(offline_settings(), providers).await
	}

	pub async fn spawn_with(
		settings: Settings,
		providers: Vec<Arc<dyn QuoteProvider>>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _) = start_with(settings, providers).await;
		Self::spawn_server_with_app(app).await
	}

	pub async fn spawn_with_settings(
		settings: Settings,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let (app, _) = QuoteRouterBuilder::new().with_settings(settings).start().await?;
		Self::spawn_server_with_app(app).await
	}

	async fn spawn_server_with_app(app: Router) -> Result<Self, Box<dyn std::error::Error>> {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Ok(Self { base_url, handle })
	}

	pub fn quote_url(&self) -> String {
		format!("{}/api/v1/quote", self.base_url)
	}

	pub fn abort(self) {
		self.handle.abort();
	}
}
