//! Quote Router API
//!
//! Axum router and handlers exposing the quote engine over HTTP.

pub mod handlers;
pub mod router;
pub mod security;
pub mod state;

pub use router::create_router;
pub use state::AppState;
