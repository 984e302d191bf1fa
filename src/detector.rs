//! Detection strategies.
//!
//! The service runs exactly one [`Detector`], chosen at construction time:
//! either the [`SimulatedDetector`] (the default, returns canned results) or a
//! [`ModelDetector`] wrapping a real inference backend.

use crate::decode::DecodedFrame;
use crate::labels;

/// A single raw detection: a class id into the COCO vocabulary, a normalized
/// box center, and a confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub class_id: u32,
    pub box_x: f32,
    pub box_y: f32,
    pub confidence: f32,
}

/// Errors a detector may surface to the request pipeline.
///
/// These are recovered at the service layer and never abort a request.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("inference backend failed: {0}")]
    Backend(String),
}

/// Trait for implementing detection strategies that the service can run.
///
/// Implementations must be shareable across concurrently executing requests;
/// the service holds them behind an `Arc` and never takes a lock.
pub trait Detector: Send + Sync {
    /// Runs detection over a decoded frame.
    fn detect(&self, frame: &DecodedFrame) -> Result<Vec<RawDetection>, DetectError>;

    /// Whether a real model backs this detector. Reported on `/health` and
    /// `/stats`.
    fn model_loaded(&self) -> bool {
        false
    }
}

/// The fixed candidate pool the simulator draws from.
const SIMULATED_POOL: [RawDetection; 4] = [
    RawDetection {
        class_id: 56, // chair
        box_x: 0.3,
        box_y: 0.6,
        confidence: 0.95,
    },
    RawDetection {
        class_id: 58, // potted plant
        box_x: 0.7,
        box_y: 0.3,
        confidence: 0.87,
    },
    RawDetection {
        class_id: 62, // tv
        box_x: 0.2,
        box_y: 0.2,
        confidence: 0.92,
    },
    RawDetection {
        class_id: 39, // bottle
        box_x: 0.8,
        box_y: 0.7,
        confidence: 0.78,
    },
];

/// Returns 1 to 3 detections drawn from a fixed pool of common indoor
/// objects, in randomized order. Never inspects the frame and never fails.
pub struct SimulatedDetector;

impl Detector for SimulatedDetector {
    fn detect(&self, _frame: &DecodedFrame) -> Result<Vec<RawDetection>, DetectError> {
        use rand::Rng;
        use rand::seq::SliceRandom;

        let mut rng = rand::thread_rng();
        let mut pool = SIMULATED_POOL.to_vec();
        pool.shuffle(&mut rng);
        pool.truncate(rng.gen_range(1..=3));
        Ok(pool)
    }
}

/// A candidate produced by an inference backend: per-class scores plus a box
/// center in pixel units of the input frame.
pub struct Candidate {
    pub class_scores: Vec<f32>,
    pub center_x: f32,
    pub center_y: f32,
}

/// Trait for real inference backends the [`ModelDetector`] can drive.
pub trait InferenceBackend: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the model over the frame and returns raw candidates.
    fn infer(&self, frame: &DecodedFrame) -> Result<Vec<Candidate>, Self::Error>;
}

/// Minimum top-class confidence for a candidate to survive filtering.
const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Runs a real inference backend and post-processes its candidates: argmax
/// over class scores, confidence filtering, and normalization of box centers
/// by frame dimensions.
///
/// Backend failures are logged and mapped to an empty result; detection
/// failures are non-fatal to the request.
pub struct ModelDetector<B> {
    backend: B,
}

impl<B: InferenceBackend> ModelDetector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: InferenceBackend> Detector for ModelDetector<B> {
    fn detect(&self, frame: &DecodedFrame) -> Result<Vec<RawDetection>, DetectError> {
        let candidates = match self.backend.infer(frame) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::error!("Detection error: {e}");
                return Ok(Vec::new());
            }
        };

        let (width, height) = (frame.width() as f32, frame.height() as f32);

        let detections = candidates
            .into_iter()
            .filter_map(|candidate| {
                let (class_id, confidence) = top_class(&candidate.class_scores)?;
                if confidence <= CONFIDENCE_THRESHOLD {
                    return None;
                }
                if labels::class_name(class_id).is_none() {
                    log::warn!("Dropping detection with unknown class id {class_id}");
                    return None;
                }
                Some(RawDetection {
                    class_id,
                    box_x: candidate.center_x / width,
                    box_y: candidate.center_y / height,
                    confidence,
                })
            })
            .collect();

        Ok(detections)
    }

    fn model_loaded(&self) -> bool {
        true
    }
}

fn top_class(scores: &[f32]) -> Option<(u32, f32)> {
    scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(id, score)| (id as u32, *score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn blank_frame(width: u32, height: u32) -> DecodedFrame {
        DecodedFrame {
            pixels: RgbImage::new(width, height),
        }
    }

    #[test]
    fn simulator_returns_one_to_three_pool_entries() {
        let detector = SimulatedDetector;
        let frame = blank_frame(10, 10);
        for _ in 0..200 {
            let detections = detector.detect(&frame).unwrap();
            assert!((1..=3).contains(&detections.len()));
            for det in &detections {
                assert!(SIMULATED_POOL.contains(det));
                assert!(labels::class_name(det.class_id).is_some());
            }
        }
    }

    #[test]
    fn simulator_reports_no_model() {
        assert!(!SimulatedDetector.model_loaded());
    }

    struct FixedBackend(Vec<Candidate>);

    impl InferenceBackend for FixedBackend {
        type Error = std::io::Error;

        fn infer(&self, _frame: &DecodedFrame) -> Result<Vec<Candidate>, Self::Error> {
            Ok(self
                .0
                .iter()
                .map(|c| Candidate {
                    class_scores: c.class_scores.clone(),
                    center_x: c.center_x,
                    center_y: c.center_y,
                })
                .collect())
        }
    }

    struct FailingBackend;

    impl InferenceBackend for FailingBackend {
        type Error = std::io::Error;

        fn infer(&self, _frame: &DecodedFrame) -> Result<Vec<Candidate>, Self::Error> {
            Err(std::io::Error::other("weights not loaded"))
        }
    }

    #[test]
    fn model_detector_filters_by_confidence_and_normalizes() {
        let mut strong = vec![0.0; 80];
        strong[62] = 0.9; // tv
        let mut weak = vec![0.0; 80];
        weak[15] = 0.4; // below threshold

        let detector = ModelDetector::new(FixedBackend(vec![
            Candidate {
                class_scores: strong,
                center_x: 50.0,
                center_y: 25.0,
            },
            Candidate {
                class_scores: weak,
                center_x: 10.0,
                center_y: 10.0,
            },
        ]));

        let detections = detector.detect(&blank_frame(100, 100)).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class_id, 62);
        assert!((detections[0].box_x - 0.5).abs() < 1e-6);
        assert!((detections[0].box_y - 0.25).abs() < 1e-6);
    }

    #[test]
    fn model_detector_drops_out_of_vocabulary_ids() {
        let mut scores = vec![0.0; 90];
        scores[85] = 0.9;

        let detector = ModelDetector::new(FixedBackend(vec![Candidate {
            class_scores: scores,
            center_x: 5.0,
            center_y: 5.0,
        }]));

        assert!(detector.detect(&blank_frame(10, 10)).unwrap().is_empty());
    }

    #[test]
    fn backend_failure_yields_empty_result() {
        let detector = ModelDetector::new(FailingBackend);
        assert!(detector.detect(&blank_frame(10, 10)).unwrap().is_empty());
        assert!(detector.model_loaded());
    }
}
