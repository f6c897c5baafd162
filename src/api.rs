//! Unified API router for ChatShield
//!
//! Merges the moderation router with the root health probe and CORS.
//!
//! ## Endpoint Map
//!
//! | Prefix                  | Module  | Description                      |
//! |-------------------------|---------|----------------------------------|
//! | `/health`               | api     | Load balancer health probe       |
//! | `/api/v1/moderation/*`  | service | Detect, stats, user violations   |

use crate::service::handler::moderation_router;
use crate::service::ModerationService;
use axum::{
    extract::State,
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the complete ChatShield HTTP application
pub fn build_app(service: Arc<ModerationService>, cors_origins: &[String]) -> Router {
    let cors = build_cors(cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .with_state(service.clone())
        .merge(moderation_router(service))
        .layer(cors)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Liveness probe, independent of detection state
async fn health_check(State(service): State<Arc<ModerationService>>) -> impl IntoResponse {
    let status = if service.health() { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
