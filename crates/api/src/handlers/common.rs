use axum::{http::StatusCode, response::Json};
use serde::Serialize;

/// Error body for failures that are not classified quote failures
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub timestamp: i64,
}

impl ErrorResponse {
	pub fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
			timestamp: chrono::Utc::now().timestamp(),
		}
	}

	pub fn with_status(self, status: StatusCode) -> (StatusCode, Json<ErrorResponse>) {
		(status, Json(self))
	}
}
