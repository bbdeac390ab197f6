// ABOUTME: HTTP request handlers for code execution sessions
// ABOUTME: Validates payloads, drives the session manager, maps outcomes to statuses

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::response::{ErrorMessage, ErrorResponse, RunCodeRequest, RunCodeResponse};
use crate::AppState;

/// Execute one submitted code snippet
///
/// Validation failures short-circuit with 400 before any workspace is
/// allocated; timeout maps to 408 as its own outcome; only infrastructure
/// faults produce a 500, with a generic message.
pub async fn run_code(
    State(manager): State<AppState>,
    payload: Result<Json<RunCodeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorMessage::new("Request body must be JSON")),
        )
            .into_response();
    };

    if request.code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorMessage::new("No code provided")),
        )
            .into_response();
    }

    info!("Received run_code request ({} bytes)", request.code.len());

    match manager.run_session(&request.code).await {
        Ok(outcome) if outcome.timed_out => {
            let limit = manager.timeout().as_secs();
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(ErrorResponse::new(format!(
                    "Code execution timed out ({limit} second limit)"
                ))),
            )
                .into_response()
        }
        Ok(outcome) => Json(RunCodeResponse::from(outcome)).into_response(),
        Err(e) => {
            error!("Session failed with a service fault: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}

/// Liveness endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
