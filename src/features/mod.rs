pub mod low_level;
pub mod mid_level;
pub mod high_level;
pub mod integration;

use image::RgbaImage;

use crate::detection::FeatureDetector;
use crate::error::ExtractionError;
use crate::models::SegmentationMask;
use crate::semantic::SemanticFeatures;
use high_level::HighLevelFeatures;
use low_level::LowLevelFeatures;
use mid_level::MidLevelFeatures;

/// The four feature bundles of one image.
///
/// `mid_level` depends only on the pixels and the mask, `high_level` only on
/// `mid_level`, and `semantic` only on the segmentation result.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub low_level: LowLevelFeatures,
    pub mid_level: MidLevelFeatures,
    pub high_level: HighLevelFeatures,
    pub semantic: SemanticFeatures,
}

/// Compute all four bundles.
pub fn extract_feature_set(
    img: &RgbaImage,
    mask: &SegmentationMask,
    semantic: SemanticFeatures,
    detector: &FeatureDetector,
) -> Result<FeatureSet, ExtractionError> {
    let mid_level = detector.detect(img, mask)?;
    let low_level = low_level::extract_low_level(img);
    let high_level = high_level::extract_high_level(&mid_level);

    Ok(FeatureSet {
        low_level,
        mid_level,
        high_level,
        semantic,
    })
}
