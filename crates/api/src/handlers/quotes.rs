use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use qr_service::QuoteServiceError;
use qr_types::QuoteRequest;

/// POST /api/v1/quote - Best quote for a swap or bridge request
///
/// Classified failures are answered with 422 and the failure contract as
/// the body, so callers can branch on `reason` and `retryable`.
pub async fn post_quote(
	State(state): State<AppState>,
	payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Response {
	let Json(request) = match payload {
		Ok(json) => json,
		Err(rejection) => {
			return ErrorResponse::new("INVALID_JSON", rejection.body_text())
				.with_status(StatusCode::BAD_REQUEST)
				.into_response();
		},
	};

	info!(
		"Received quote request {} ({} mode, amount {})",
		request.pair_label(),
		request.route,
		request.amount
	);

	match state.orchestrator.quote(request).await {
		Ok(quote) => {
			info!(
				"Returning {} quote {} with output {}",
				quote.provider, quote.quote_id, quote.output_amount
			);
			Json(quote).into_response()
		},
		Err(e) => service_error_response(e),
	}
}

fn service_error_response(error: QuoteServiceError) -> Response {
	match error {
		QuoteServiceError::Validation(e) => {
			ErrorResponse::new("VALIDATION_ERROR", format!("Invalid request: {}", e))
				.with_status(StatusCode::BAD_REQUEST)
				.into_response()
		},
		QuoteServiceError::NoProvider { route } => {
			warn!("No provider available for {} route", route);
			ErrorResponse::new("NO_PROVIDER", format!("No provider available for route {}", route))
				.with_status(StatusCode::SERVICE_UNAVAILABLE)
				.into_response()
		},
		QuoteServiceError::Failed(failure) => {
			info!("Quote failed: {} (retryable: {})", failure.reason, failure.retryable);
			(StatusCode::UNPROCESSABLE_ENTITY, Json(failure)).into_response()
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::router::create_router;
	use async_trait::async_trait;
	use axum::{
		body::{to_bytes, Body},
		http::{header, Request},
	};
	use mockall::mock;
	use qr_service::QuoteOrchestratorTrait;
	use qr_types::{
		Amount, ErrorReason, MinAmountHint, NormalizedQuote, ProviderKind, QuoteFailure,
		QuoteValidationError, RouteMode,
	};
	use serde_json::{json, Value};
	use std::sync::Arc;
	use tower::ServiceExt;

	mock! {
		pub Orchestrator {}

		#[async_trait]
		impl QuoteOrchestratorTrait for Orchestrator {
			async fn quote(&self, request: QuoteRequest) -> Result<NormalizedQuote, QuoteServiceError>;
		}
	}

	fn body() -> Value {
		json!({
			"srcChainId": 1,
			"dstChainId": 1,
			"srcToken": { "address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "decimals": 6, "priceUsd": 1.0 },
			"dstToken": { "address": "0xdac17f958d2ee523a2206206994597c13d831ec7", "decimals": 6 },
			"amount": "1000000",
			"sender": "0x742d35Cc6634C0532925a3b8D2a27F79c5a85b03",
			"slippagePercent": 0.5
		})
	}

	fn quote() -> NormalizedQuote {
		NormalizedQuote {
			quote_id: "q-1".to_string(),
			provider: ProviderKind::DirectSwap,
			output_amount: Amount::from(999_000u64),
			min_output_amount: Amount::from(994_005u64),
			approval_target: None,
			transaction: None,
			fees: Vec::new(),
			estimated_duration_secs: None,
		}
	}

	async fn send(mock: MockOrchestrator, body: String) -> (StatusCode, Value) {
		let app = create_router().with_state(AppState::new(Arc::new(mock)));
		let response = app
			.oneshot(
				Request::builder()
					.method("POST")
					.uri("/api/v1/quote")
					.header(header::CONTENT_TYPE, "application/json")
					.body(Body::from(body))
					.unwrap(),
			)
			.await
			.unwrap();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
		let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
		(status, value)
	}

	#[tokio::test]
	async fn test_returns_best_quote() {
		let mut mock = MockOrchestrator::new();
		mock.expect_quote()
			.withf(|request| request.route == RouteMode::Auto)
			.times(1)
			.returning(|_| Ok(quote()));

		let (status, json) = send(mock, body().to_string()).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(json["outputAmount"], "999000");
		assert_eq!(json["quoteId"], "q-1");
	}

	#[tokio::test]
	async fn test_classified_failure_is_unprocessable() {
		let mut mock = MockOrchestrator::new();
		mock.expect_quote().returning(|_| {
			let mut failure =
				QuoteFailure::new(ErrorReason::MinAmount, "Amount too small. Minimum is 7.5.");
			failure.min_amount_hint = Some(MinAmountHint {
				min_amount: Amount::from(7_500_000u64),
				formatted: "7.5".to_string(),
				usd_estimate: Some(7.5),
			});
			Err(QuoteServiceError::Failed(failure))
		});

		let (status, json) = send(mock, body().to_string()).await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(json["reason"], "MIN_AMOUNT");
		assert_eq!(json["retryable"], false);
		assert_eq!(json["minAmountHint"]["minAmount"], "7500000");
	}

	#[tokio::test]
	async fn test_validation_error_is_bad_request() {
		let mut mock = MockOrchestrator::new();
		mock.expect_quote().returning(|_| {
			Err(QuoteServiceError::Validation(QuoteValidationError::InvalidAmount {
				reason: "must be greater than zero".to_string(),
			}))
		});

		let (status, json) = send(mock, body().to_string()).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(json["error"], "VALIDATION_ERROR");
	}

	#[tokio::test]
	async fn test_malformed_json_never_reaches_orchestrator() {
		let mut mock = MockOrchestrator::new();
		mock.expect_quote().never();

		let (status, json) = send(mock, "{\"srcChainId\": 1".to_string()).await;
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(json["error"], "INVALID_JSON");
	}

	#[tokio::test]
	async fn test_missing_provider_is_unavailable() {
		let mut mock = MockOrchestrator::new();
		mock.expect_quote()
			.returning(|_| Err(QuoteServiceError::NoProvider { route: RouteMode::Bridge }));

		let (status, json) = send(mock, body().to_string()).await;
		assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
		assert_eq!(json["error"], "NO_PROVIDER");
	}

	#[tokio::test]
	async fn test_health_and_security_headers() {
		let app = create_router().with_state(AppState::new(Arc::new(MockOrchestrator::new())));
		let response = app
			.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(response.headers()["x-content-type-options"], "nosniff");
		assert_eq!(response.headers()["cache-control"], "no-store");
		assert!(response.headers().contains_key("x-request-id"));
	}
}
