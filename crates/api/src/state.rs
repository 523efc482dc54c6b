use std::sync::Arc;

use qr_service::QuoteOrchestratorTrait;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub orchestrator: Arc<dyn QuoteOrchestratorTrait>,
}

impl AppState {
	pub fn new(orchestrator: Arc<dyn QuoteOrchestratorTrait>) -> Self {
		Self { orchestrator }
	}
}
