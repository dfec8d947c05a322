use image::{GrayImage, Luma};

use crate::detection::preprocessing::{gaussian_blur_3x3, non_max_suppression, sobel};
use crate::models::SegmentationMask;

/// Intensity written for edge pixels in the edge map
pub const EDGE_VALUE: u8 = 255;

/// Blur, Sobel, non-maximum suppression and threshold.
///
/// Returns a map holding `EDGE_VALUE` at edge pixels and 0 elsewhere. With a
/// mask, pixels outside it are never edges.
pub fn detect_edges(gray: &GrayImage, threshold: u8, mask: Option<&SegmentationMask>) -> GrayImage {
    let smoothed = gaussian_blur_3x3(gray);
    let gradient = sobel(&smoothed);
    let suppressed = non_max_suppression(&gradient);

    let (width, height) = gray.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let masked_in = mask.is_none_or(|m| m.contains(x, y));
        if masked_in && suppressed.get_pixel(x, y)[0] > threshold {
            Luma([EDGE_VALUE])
        } else {
            Luma([0])
        }
    })
}

pub fn is_edge(edges: &GrayImage, x: u32, y: u32) -> bool {
    edges.get_pixel(x, y)[0] > 0
}

pub fn count_edge_pixels(edges: &GrayImage) -> usize {
    edges.pixels().filter(|p| p[0] > 0).count()
}

/// Fraction of pixels that are edges. 0 for an empty map.
pub fn edge_fraction(edges: &GrayImage) -> f64 {
    let total = edges.width() as usize * edges.height() as usize;
    count_edge_pixels(edges) as f64 / total.max(1) as f64
}
