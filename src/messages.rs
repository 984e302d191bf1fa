//! Wire types for the HTTP surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A camera frame submitted for detection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionRequest {
    /// Base64-encoded image, optionally with a data-URL prefix.
    pub image: String,
    /// Client-side capture time, seconds.
    pub timestamp: f64,
    /// Client-assigned frame id. Not guaranteed unique or ordered.
    pub frame_id: i64,
    /// Free-form tag, currently unused by detection logic.
    pub detection_type: String,
}

/// One detected object with a normalized box center.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Detection {
    pub class_id: u32,
    pub box_x: f32,
    pub box_y: f32,
    pub confidence: f32,
}

/// The result of processing one frame.
///
/// `detections` is `null` when detection failed after a successful decode; in
/// that case `status` carries the error text. The HTTP status is still 200,
/// the client contract is "always return a parsable response".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DetectionResponse {
    pub detections: Option<Vec<Detection>>,
    pub processing_time: f64,
    pub frame_id: i64,
    pub status: String,
}

/// Boundary error envelope for 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub status_code: u16,
    pub timestamp: f64,
}

/// Payload for `GET /`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GreetingResponse {
    pub message: String,
    pub status: String,
    pub version: String,
}

/// Payload for `GET /health`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub coco_classes: usize,
    pub timestamp: f64,
}

/// Payload for `GET /classes`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassesResponse {
    pub classes: BTreeMap<u32, String>,
    pub total_classes: usize,
}

/// Payload for `GET /stats`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsResponse {
    pub uptime: f64,
    pub model_loaded: bool,
    pub supported_classes: usize,
    pub api_version: String,
}
