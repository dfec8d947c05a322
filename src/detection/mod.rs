pub mod preprocessing;
pub mod edges;
pub mod corners;
pub mod blobs;
pub mod lines;
pub mod keypoints;

use image::RgbaImage;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::features::mid_level::MidLevelFeatures;
use crate::models::SegmentationMask;
use corners::HarrisParams;
use lines::HoughParams;

/// Runs the edge, corner, blob, line and keypoint detectors over one image
pub struct FeatureDetector {
    pub edge_threshold: u8,
    pub grid_size: u32,
    pub keypoint_floor: u8,
    pub harris: HarrisParams,
    pub blob_threshold: u8,
    pub blob_min_area: u32,
    pub hough: HoughParams,
}

impl FeatureDetector {
    pub fn new() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            edge_threshold: config.edge_threshold,
            grid_size: config.keypoint_grid_size,
            keypoint_floor: config.keypoint_strength_floor,
            harris: HarrisParams {
                k: config.harris_k,
                threshold: config.corner_threshold,
                suppression_radius: config.corner_suppression_radius,
            },
            blob_threshold: config.blob_threshold,
            blob_min_area: config.blob_min_area,
            hough: HoughParams {
                theta_bins: config.hough_theta_bins,
                rho_bins: config.hough_rho_bins,
                vote_threshold: config.line_vote_threshold,
                max_lines: config.max_lines,
                max_edge_pixels: config.max_hough_edge_pixels,
            },
        }
    }

    /// Run all mid-level detectors. Edges and keypoints are restricted to
    /// `mask`; corners and blobs always see the whole image.
    pub fn detect(
        &self,
        img: &RgbaImage,
        mask: &SegmentationMask,
    ) -> Result<MidLevelFeatures, ExtractionError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ExtractionError::EmptyImage { width, height });
        }
        if mask.dimensions() != (width, height) {
            return Err(ExtractionError::MaskDimensions {
                width,
                height,
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }

        let gray = preprocessing::to_grayscale(img);

        let edges = edges::detect_edges(&gray, self.edge_threshold, Some(mask));
        debug!(edge_pixels = edges::count_edge_pixels(&edges), "Detected edges");

        let corners = corners::detect_corners(&gray, &self.harris);
        debug!(count = corners.len(), "Detected corners");

        let blobs = blobs::detect_blobs(&gray, self.blob_threshold, self.blob_min_area);
        debug!(count = blobs.len(), "Detected blobs");

        let lines = lines::detect_lines(&edges, &self.hough)?;
        debug!(count = lines.len(), "Detected lines");

        let keypoints = keypoints::extract_keypoints(&edges, self.grid_size, self.keypoint_floor, Some(mask));
        debug!(count = keypoints.len(), "Extracted keypoints");

        Ok(MidLevelFeatures {
            edges,
            corners,
            blobs,
            lines,
            keypoints,
            width,
            height,
        })
    }
}

impl Default for FeatureDetector {
    fn default() -> Self {
        Self::new()
    }
}
