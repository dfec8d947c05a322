use std::time::Duration;

/// Faults inside the layered extractor. Any of these makes the pipeline
/// fall back to the single-pass edge and keypoint extractor.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Mask is {mask_width}x{mask_height} but image is {width}x{height}")]
    MaskDimensions {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },
    #[error("Edge map holds {edge_pixels} edge pixels, Hough budget is {budget}")]
    HoughBudgetExceeded { edge_pixels: usize, budget: usize },
}

/// Outcomes of the external segmentation call that count as "unavailable".
#[derive(Debug, Clone, thiserror::Error)]
pub enum SegmentationError {
    #[error("Segmentation service unavailable: {0}")]
    Unavailable(String),
    #[error("Segmentation service timed out after {0:?}")]
    Timeout(Duration),
    #[error("Segmentation mask is {mask_width}x{mask_height}, expected {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
