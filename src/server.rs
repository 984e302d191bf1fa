//! HTTP boundary: routes, handlers, and the error envelope.

use crate::messages::{DetectionRequest, ErrorEnvelope, GreetingResponse};
use crate::service::{DetectionService, unix_timestamp};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

/// Base64 full-resolution camera frames run well past axum's 2 MB default.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Builds the application router around a shared service instance.
///
/// CORS is permissive: the iOS client calls from an app origin. A panic in
/// any handler is converted to a 500 envelope without leaking details.
pub fn router(service: Arc<DetectionService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/upload_image", post(upload_image))
        .route("/classes", get(classes))
        .route("/stats", get(stats))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(|_: Box<dyn std::any::Any + Send>| {
            log::error!("Unhandled panic in request handler");
            error_envelope(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .with_state(service)
}

fn error_envelope(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            error: message.into(),
            status_code: status.as_u16(),
            timestamp: unix_timestamp(),
        }),
    )
        .into_response()
}

async fn root() -> impl IntoResponse {
    Json(GreetingResponse {
        message: "Grounded AR Detection API".to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn health(State(service): State<Arc<DetectionService>>) -> impl IntoResponse {
    Json(service.health())
}

async fn upload_image(
    State(service): State<Arc<DetectionService>>,
    Json(request): Json<DetectionRequest>,
) -> Response {
    match service.process_frame(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            log::error!("Image decoding error: {e}");
            error_envelope(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

async fn classes(State(service): State<Arc<DetectionService>>) -> impl IntoResponse {
    Json(service.classes())
}

async fn stats(State(service): State<Arc<DetectionService>>) -> impl IntoResponse {
    Json(service.stats())
}

async fn not_found() -> Response {
    error_envelope(StatusCode::NOT_FOUND, "Not found")
}
