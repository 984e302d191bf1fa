//! The detection service: an explicitly constructed, immutable configuration
//! object that owns the detector and processes one frame per call.
//!
//! There is no per-request mutable state; a single instance is shared across
//! concurrently executing requests without locking.

use crate::decode::{self, DecodeError};
use crate::detector::{Detector, SimulatedDetector};
use crate::labels::COCO_CLASSES;
use crate::messages::{
    ClassesResponse, Detection, DetectionRequest, DetectionResponse, HealthResponse, StatsResponse,
};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Seconds since the unix epoch, as reported in health payloads and error
/// envelopes.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

pub struct DetectionService {
    detector: Box<dyn Detector>,
    started_at: Instant,
}

impl DetectionService {
    /// Creates a service backed by the given detector.
    pub fn new(detector: Box<dyn Detector>) -> Self {
        Self {
            detector,
            started_at: Instant::now(),
        }
    }

    /// Creates a service running the canned simulator. This is the default
    /// when no real model is configured.
    pub fn simulated() -> Self {
        Self::new(Box::new(SimulatedDetector))
    }

    /// Processes one camera frame.
    ///
    /// A decode failure propagates so the HTTP layer can answer with a 400.
    /// Any detection failure after a successful decode is recovered here: the
    /// response carries `detections: null` and an `"error: ..."` status but is
    /// still delivered as a normal result.
    pub fn process_frame(
        &self,
        request: &DetectionRequest,
    ) -> Result<DetectionResponse, DecodeError> {
        let start = Instant::now();
        log::info!("Processing frame {}", request.frame_id);

        let frame = decode::decode_frame(&request.image)?;
        log::info!("Image size: {}x{}", frame.width(), frame.height());

        let result = self.detector.detect(&frame);
        let processing_time = start.elapsed().as_secs_f64();

        match result {
            Ok(raw) => {
                let detections: Vec<Detection> = raw
                    .into_iter()
                    .map(|det| Detection {
                        class_id: det.class_id,
                        box_x: det.box_x,
                        box_y: det.box_y,
                        confidence: det.confidence,
                    })
                    .collect();

                log::info!(
                    "Detected {} objects in {:.3}s",
                    detections.len(),
                    processing_time
                );

                Ok(DetectionResponse {
                    detections: Some(detections),
                    processing_time,
                    frame_id: request.frame_id,
                    status: "success".to_string(),
                })
            }
            Err(e) => {
                log::error!("Processing error: {e}");
                Ok(DetectionResponse {
                    detections: None,
                    processing_time,
                    frame_id: request.frame_id,
                    status: format!("error: {e}"),
                })
            }
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.detector.model_loaded()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            model_loaded: self.model_loaded(),
            coco_classes: COCO_CLASSES.len(),
            timestamp: unix_timestamp(),
        }
    }

    pub fn classes(&self) -> ClassesResponse {
        ClassesResponse {
            classes: COCO_CLASSES
                .iter()
                .enumerate()
                .map(|(id, name)| (id as u32, name.to_string()))
                .collect(),
            total_classes: COCO_CLASSES.len(),
        }
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            uptime: self.started_at.elapsed().as_secs_f64(),
            model_loaded: self.model_loaded(),
            supported_classes: COCO_CLASSES.len(),
            api_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
