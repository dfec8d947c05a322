mod fixtures;
pub use fixtures::*;

use glyphcast::semantic::{Pose, Segmentation, SegmentationService};
use glyphcast::{ModelConfig, SegmentationError, SegmentationMask};
use image::RgbaImage;
use std::time::Duration;

/// Service that answers immediately with a fixed mask.
pub struct StaticSegmentation {
    pub mask: SegmentationMask,
    pub poses: Option<Vec<Pose>>,
}

impl StaticSegmentation {
    pub fn new(mask: SegmentationMask) -> Self {
        Self { mask, poses: None }
    }
}

impl SegmentationService for StaticSegmentation {
    async fn segment(&self, _image: &RgbaImage, _config: &ModelConfig) -> Result<Segmentation, SegmentationError> {
        Ok(Segmentation {
            mask: self.mask.clone(),
            poses: self.poses.clone(),
        })
    }
}

/// Service that always reports an error.
pub struct FailingSegmentation;

impl SegmentationService for FailingSegmentation {
    async fn segment(&self, _image: &RgbaImage, _config: &ModelConfig) -> Result<Segmentation, SegmentationError> {
        Err(SegmentationError::Unavailable("backend offline".to_string()))
    }
}

/// Service that answers with a full mask after `delay`.
pub struct SlowSegmentation {
    pub delay: Duration,
}

impl SegmentationService for SlowSegmentation {
    async fn segment(&self, image: &RgbaImage, _config: &ModelConfig) -> Result<Segmentation, SegmentationError> {
        tokio::time::sleep(self.delay).await;
        Ok(Segmentation {
            mask: SegmentationMask::all(image.width(), image.height()),
            poses: None,
        })
    }
}
