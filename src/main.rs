//! Quote Router Server
//!
//! Main entry point for the quote router server

use quote_router::QuoteRouterBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	QuoteRouterBuilder::new().start_server().await
}
