//! Boundary to the external person-segmentation service.
//!
//! The service is the only asynchronous collaborator of the pipeline. Its
//! result is folded into a [`SemanticOutcome`]: either the mask plus the
//! derived semantic features, or `Unavailable` with the reason. Downstream
//! stages consume both variants the same way, so a missing, failing or slow
//! service degrades to an all-pixels mask and zeroed semantic features.

use image::RgbaImage;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::SegmentationError;
use crate::models::{BoundingBox, SegmentationMask};

/// Pose keypoints below this confidence are discarded
pub const MIN_POSE_SCORE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseKeypoint {
    pub part: String,
    pub x: f64,
    pub y: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    pub keypoints: Vec<PoseKeypoint>,
}

/// Raw service response
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub mask: SegmentationMask,
    /// Per-person body-part keypoints, when the service provides them
    pub poses: Option<Vec<Pose>>,
}

pub trait SegmentationService: Send + Sync {
    fn segment(
        &self,
        image: &RgbaImage,
        config: &ModelConfig,
    ) -> impl Future<Output = Result<Segmentation, SegmentationError>> + Send;
}

/// Service stand-in for runs without a segmentation backend
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSegmentation;

impl SegmentationService for NoSegmentation {
    async fn segment(
        &self,
        _image: &RgbaImage,
        _config: &ModelConfig,
    ) -> Result<Segmentation, SegmentationError> {
        Err(SegmentationError::Unavailable(
            "no segmentation service configured".to_string(),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonSegmentation {
    pub detected: bool,
    /// Fraction of image pixels inside the mask
    pub coverage: f64,
    pub aspect_ratio: f64,
    pub bounding_box: BoundingBox,
}

impl PersonSegmentation {
    pub fn not_detected() -> Self {
        Self {
            detected: false,
            coverage: 0.0,
            aspect_ratio: 0.0,
            bounding_box: BoundingBox::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartRelationship {
    pub parts: (String, String),
    pub distance: f64,
    /// atan2(dy, dx) from the first part to the second, radians
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseAnalysis {
    pub keypoints: Vec<PoseKeypoint>,
    pub relationships: Vec<PartRelationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPartAnalysis {
    pub part_count: usize,
    pub parts: Vec<PoseAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticFeatures {
    pub person: PersonSegmentation,
    pub body_parts: Option<BodyPartAnalysis>,
}

impl SemanticFeatures {
    /// Features reported when segmentation could not be obtained
    pub fn unavailable() -> Self {
        Self {
            person: PersonSegmentation::not_detected(),
            body_parts: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SemanticOutcome {
    Available {
        mask: SegmentationMask,
        features: SemanticFeatures,
    },
    Unavailable(SegmentationError),
}

impl SemanticOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, SemanticOutcome::Available { .. })
    }

    /// The service mask, or an all-pixels mask when unavailable
    pub fn mask(&self, width: u32, height: u32) -> SegmentationMask {
        match self {
            SemanticOutcome::Available { mask, .. } => mask.clone(),
            SemanticOutcome::Unavailable(_) => SegmentationMask::all(width, height),
        }
    }

    pub fn features(&self) -> SemanticFeatures {
        match self {
            SemanticOutcome::Available { features, .. } => features.clone(),
            SemanticOutcome::Unavailable(_) => SemanticFeatures::unavailable(),
        }
    }
}

/// Calls the segmentation service under a timeout and converts its answer
pub struct SemanticAdapter {
    pub timeout: Duration,
    pub model: ModelConfig,
}

impl SemanticAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            model: ModelConfig::default(),
        }
    }

    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Never fails: every failure mode ends up as `SemanticOutcome::Unavailable`.
    pub async fn acquire<S: SegmentationService>(&self, service: &S, image: &RgbaImage) -> SemanticOutcome {
        let response = tokio::time::timeout(self.timeout, service.segment(image, &self.model)).await;

        let result = match response {
            Err(_) => Err(SegmentationError::Timeout(self.timeout)),
            Ok(result) => result.and_then(|segmentation| check_dimensions(segmentation, image)),
        };

        match result {
            Ok(segmentation) => {
                let features = analyze(&segmentation);
                debug!(
                    detected = features.person.detected,
                    coverage = features.person.coverage,
                    "Segmentation available"
                );
                SemanticOutcome::Available {
                    mask: segmentation.mask,
                    features,
                }
            }
            Err(e) => {
                warn!("Segmentation unavailable, using full-image mask: {e}");
                SemanticOutcome::Unavailable(e)
            }
        }
    }
}

fn check_dimensions(segmentation: Segmentation, image: &RgbaImage) -> Result<Segmentation, SegmentationError> {
    let (width, height) = image.dimensions();
    let (mask_width, mask_height) = segmentation.mask.dimensions();
    if (mask_width, mask_height) != (width, height) {
        return Err(SegmentationError::DimensionMismatch {
            width,
            height,
            mask_width,
            mask_height,
        });
    }
    Ok(segmentation)
}

pub fn analyze(segmentation: &Segmentation) -> SemanticFeatures {
    SemanticFeatures {
        person: analyze_mask(&segmentation.mask),
        body_parts: segmentation.poses.as_deref().map(analyze_poses),
    }
}

/// Coverage, bounding box and aspect ratio of the masked region.
pub fn analyze_mask(mask: &SegmentationMask) -> PersonSegmentation {
    let (width, height) = mask.dimensions();
    let mut person_pixels = 0usize;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (width, height, 0, 0);

    for y in 0..height {
        for x in 0..width {
            if mask.contains(x, y) {
                person_pixels += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if person_pixels == 0 {
        return PersonSegmentation::not_detected();
    }

    let box_width = max_x - min_x + 1;
    let box_height = max_y - min_y + 1;
    PersonSegmentation {
        detected: true,
        coverage: person_pixels as f64 / (width as f64 * height as f64).max(1.0),
        aspect_ratio: box_width as f64 / box_height as f64,
        bounding_box: BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
            width: box_width,
            height: box_height,
        },
    }
}

/// Keep confident keypoints of each pose and relate every pair of them.
pub fn analyze_poses(poses: &[Pose]) -> BodyPartAnalysis {
    let parts: Vec<PoseAnalysis> = poses
        .iter()
        .map(|pose| {
            let keypoints: Vec<PoseKeypoint> = pose
                .keypoints
                .iter()
                .filter(|kp| kp.score > MIN_POSE_SCORE)
                .cloned()
                .collect();

            let mut relationships = Vec::new();
            for (i, a) in keypoints.iter().enumerate() {
                for b in &keypoints[i + 1..] {
                    let dx = b.x - a.x;
                    let dy = b.y - a.y;
                    relationships.push(PartRelationship {
                        parts: (a.part.clone(), b.part.clone()),
                        distance: (dx * dx + dy * dy).sqrt(),
                        angle: dy.atan2(dx),
                    });
                }
            }

            PoseAnalysis {
                keypoints,
                relationships,
            }
        })
        .collect();

    BodyPartAnalysis {
        part_count: parts.len(),
        parts,
    }
}
