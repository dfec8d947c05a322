//! Single-pass edge and keypoint extractor used when the layered extractor
//! fails.

use image::{GrayImage, Luma, RgbaImage};
use std::f64::consts::PI;

use crate::classifier::CharacterPatterns;
use crate::detection::edges::EDGE_VALUE;
use crate::detection::keypoints::extract_keypoints;
use crate::detection::preprocessing::sobel_components;
use crate::models::{KeyPoint, SegmentationMask};

/// Keypoint pairs farther apart than this are not treated as strokes
const MAX_STROKE_LENGTH: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct FallbackFeatures {
    pub edges: GrayImage,
    pub keypoints: Vec<KeyPoint>,
    pub width: u32,
    pub height: u32,
}

impl FallbackFeatures {
    pub fn patterns(&self) -> CharacterPatterns {
        analyze_patterns(&self.keypoints, self.width, self.height)
    }
}

/// Sobel over the red channel of interior masked pixels; magnitude above
/// `threshold` marks an edge. Then grid keypoints over the result.
pub fn extract_edges_and_keypoints(
    img: &RgbaImage,
    mask: &SegmentationMask,
    threshold: f64,
    grid_size: u32,
    strength_floor: u8,
) -> FallbackFeatures {
    let (width, height) = img.dimensions();
    let full;
    let mask = if mask.dimensions() == (width, height) {
        mask
    } else {
        full = SegmentationMask::all(width, height);
        &full
    };

    let mut edges = GrayImage::new(width, height);
    if width >= 3 && height >= 3 {
        let red = GrayImage::from_fn(width, height, |x, y| Luma([img.get_pixel(x, y)[0]]));
        let (gx, gy) = sobel_components(&red);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if !mask.contains(x, y) {
                    continue;
                }
                let (sx, sy) = (gx.get_pixel(x, y)[0] as f64, gy.get_pixel(x, y)[0] as f64);
                if (sx * sx + sy * sy).sqrt() > threshold {
                    edges.put_pixel(x, y, Luma([EDGE_VALUE]));
                }
            }
        }
    }

    let keypoints = extract_keypoints(&edges, grid_size, strength_floor, None);
    FallbackFeatures {
        edges,
        keypoints,
        width,
        height,
    }
}

/// Pattern descriptor built from keypoints alone.
///
/// Nearby keypoint pairs act as short strokes whose directions feed the line
/// totals; symmetry compares point counts on either side of the centroid.
pub fn analyze_patterns(keypoints: &[KeyPoint], width: u32, height: u32) -> CharacterPatterns {
    if keypoints.is_empty() {
        return CharacterPatterns::default();
    }

    let n = keypoints.len() as f64;
    let center_x = keypoints.iter().map(|kp| kp.x as f64).sum::<f64>() / n;
    let center_y = keypoints.iter().map(|kp| kp.y as f64).sum::<f64>() / n;

    let mut directions = [0.0; 8];
    for (i, a) in keypoints.iter().enumerate() {
        for b in &keypoints[i + 1..] {
            let dx = b.x as f64 - a.x as f64;
            let dy = b.y as f64 - a.y as f64;
            if (dx * dx + dy * dy).sqrt() < MAX_STROKE_LENGTH {
                let turns = (dy.atan2(dx) + PI) / (2.0 * PI);
                directions[(turns * 8.0).floor() as usize % 8] += 1.0;
            }
        }
    }
    let (horizontal_lines, vertical_lines, diagonal_lines) = CharacterPatterns::line_totals(&directions);

    let left = keypoints.iter().filter(|kp| (kp.x as f64) < center_x).count() as f64;
    let top = keypoints.iter().filter(|kp| (kp.y as f64) < center_y).count() as f64;
    let symmetry_x = 1.0 - (left - (n - left)).abs() / n;
    let symmetry_y = 1.0 - (top - (n - top)).abs() / n;

    let min_x = keypoints.iter().map(|kp| kp.x).min().unwrap_or(0);
    let max_x = keypoints.iter().map(|kp| kp.x).max().unwrap_or(0);
    let min_y = keypoints.iter().map(|kp| kp.y).min().unwrap_or(0);
    let max_y = keypoints.iter().map(|kp| kp.y).max().unwrap_or(0);
    let box_height = (max_y - min_y).max(1);

    CharacterPatterns {
        horizontal_lines,
        vertical_lines,
        diagonal_lines,
        curves: 0.0,
        symmetry_x,
        symmetry_y,
        aspect_ratio: (max_x - min_x) as f64 / box_height as f64,
        complexity: 0.0,
        density: n / (width as f64 * height as f64).max(1.0),
        keypoint_count: keypoints.len(),
    }
}
