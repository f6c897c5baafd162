//! HTTP handlers for the moderation API
//!
//! - POST /api/v1/moderation/detect — run the detection pipeline
//! - GET  /api/v1/moderation/stats  — aggregate engine information
//! - GET  /api/v1/moderation/users/:user_id/violations — rate-limit status

use super::types::{DetectRequest, DetectResponse, StatsResponse, UserViolationsResponse};
use super::{DetectionRequest, ModerationService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for moderation handlers
pub type ServiceState = Arc<ModerationService>;

/// Create the moderation router
pub fn moderation_router(service: ServiceState) -> Router {
    Router::new()
        .route("/api/v1/moderation/detect", post(detect))
        .route("/api/v1/moderation/stats", get(stats))
        .route(
            "/api/v1/moderation/users/:user_id/violations",
            get(user_violations),
        )
        .with_state(service)
}

/// POST /api/v1/moderation/detect
async fn detect(
    State(service): State<ServiceState>,
    Json(request): Json<DetectRequest>,
) -> impl IntoResponse {
    let result = service
        .detect(DetectionRequest {
            text: request.text,
            user_id: request.user_id,
            sensitivity: request.sensitivity,
        })
        .await;
    Json(DetectResponse::from(result))
}

/// GET /api/v1/moderation/stats
async fn stats(State(service): State<ServiceState>) -> impl IntoResponse {
    Json(StatsResponse::from(service.stats()))
}

/// GET /api/v1/moderation/users/:user_id/violations
async fn user_violations(
    State(service): State<ServiceState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    match service.user_violations(&user_id).await {
        Ok(status) => (
            StatusCode::OK,
            Json(UserViolationsResponse::from(status)),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": { "code": "TRACKER_ERROR", "message": e.to_string() }
            })),
        )
            .into_response(),
    }
}
