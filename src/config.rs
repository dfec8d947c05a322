use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Tunable constants for every extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Suppressed gradient magnitude an edge pixel must exceed
    pub edge_threshold: u8,
    /// Side length of the square keypoint grid cells
    pub keypoint_grid_size: u32,
    /// Edge strength a keypoint must exceed
    pub keypoint_strength_floor: u8,
    pub harris_k: f64,
    pub corner_threshold: f64,
    pub corner_suppression_radius: f64,
    pub blob_threshold: u8,
    /// Blobs need strictly more pixels than this
    pub blob_min_area: u32,
    pub hough_theta_bins: usize,
    pub hough_rho_bins: usize,
    pub line_vote_threshold: u32,
    pub max_lines: usize,
    /// Upper bound on edge pixels fed to Hough voting (None = unbounded)
    pub max_hough_edge_pixels: Option<usize>,
    pub segmentation_timeout_ms: u64,
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self {
            edge_threshold: 50,
            keypoint_grid_size: 20,
            keypoint_strength_floor: 100,
            harris_k: 0.04,
            corner_threshold: 100_000.0,
            corner_suppression_radius: 5.0,
            blob_threshold: 128,
            blob_min_area: 50,
            hough_theta_bins: 180,
            hough_rho_bins: 180,
            line_vote_threshold: 50,
            max_lines: 20,
            max_hough_edge_pixels: None,
            segmentation_timeout_ms: 5_000,
        }
    }

    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_edge_threshold(mut self, threshold: u8) -> Self {
        self.edge_threshold = threshold;
        self
    }

    pub fn with_keypoint_grid_size(mut self, grid_size: u32) -> Self {
        self.keypoint_grid_size = grid_size.max(1);
        self
    }

    pub fn with_hough_budget(mut self, max_edge_pixels: usize) -> Self {
        self.max_hough_edge_pixels = Some(max_edge_pixels);
        self
    }

    pub fn with_segmentation_timeout(mut self, timeout: Duration) -> Self {
        self.segmentation_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn segmentation_timeout(&self) -> Duration {
        Duration::from_millis(self.segmentation_timeout_ms)
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed model configuration sent along with every segmentation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub architecture: String,
    pub output_stride: u32,
    pub multiplier: f32,
    pub quant_bytes: u32,
    pub internal_resolution: String,
    pub segmentation_threshold: f32,
    pub flip_horizontal: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            architecture: "MobileNetV1".to_string(),
            output_stride: 16,
            multiplier: 0.75,
            quant_bytes: 2,
            internal_resolution: "medium".to_string(),
            segmentation_threshold: 0.7,
            flip_horizontal: false,
        }
    }
}
