//! Object detection backend for the Grounded AR app.
//!
//! The service accepts base64-encoded camera frames over HTTP, decodes them,
//! runs a pluggable detection strategy, and answers with COCO class ids,
//! normalized box centers, and confidence scores. By default detections are
//! simulated; a real inference backend can be plugged in through the
//! [`detector::InferenceBackend`] trait.

pub mod decode;
pub mod detector;
pub mod labels;
pub mod messages;
pub mod server;
pub mod service;

pub use decode::{DecodeError, DecodedFrame, decode_frame};
pub use detector::{Detector, InferenceBackend, ModelDetector, SimulatedDetector};
pub use service::DetectionService;
