use image::GrayImage;

use crate::detection::edges::edge_fraction;
use crate::models::{Blob, Corner, KeyPoint, Line};

/// Output of the edge/corner/blob/line/keypoint detectors.
#[derive(Debug, Clone)]
pub struct MidLevelFeatures {
    pub edges: GrayImage,
    pub corners: Vec<Corner>,
    pub blobs: Vec<Blob>,
    pub lines: Vec<Line>,
    pub keypoints: Vec<KeyPoint>,
    pub width: u32,
    pub height: u32,
}

impl MidLevelFeatures {
    /// Pixel count, never below 1
    pub fn area(&self) -> f64 {
        (self.width as f64 * self.height as f64).max(1.0)
    }

    pub fn keypoint_density(&self) -> f64 {
        self.keypoints.len() as f64 / self.area()
    }

    pub fn edge_fraction(&self) -> f64 {
        edge_fraction(&self.edges)
    }
}
