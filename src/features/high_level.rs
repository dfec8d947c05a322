use serde::Serialize;
use std::f64::consts::PI;

use crate::features::low_level::shannon_entropy;
use crate::features::mid_level::MidLevelFeatures;
use crate::models::{KeyPoint, Line};

pub const DIRECTION_BINS: usize = 8;
pub const LENGTH_BINS: usize = 10;
/// Pixels per line-length bin
const LENGTH_BIN_WIDTH: f64 = 50.0;
pub const DENSITY_BINS: usize = 10;
/// Side of the square grid used for spatial entropy
const SPATIAL_GRID: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeCounts {
    pub corner_count: usize,
    pub line_count: usize,
    pub blob_count: usize,
    pub keypoint_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlobShape {
    pub area: u32,
    pub perimeter: f64,
    pub circularity: f64,
    pub aspect_ratio: f64,
    pub center_x: f64,
    pub center_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeComplexity {
    pub keypoint_density: f64,
    pub corner_to_line_ratio: f64,
    /// In [0, 1]
    pub complexity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeFeatures {
    pub basic: ShapeCounts,
    pub blobs: Vec<BlobShape>,
    /// Line counts per θ/(π/8) bin
    pub line_directions: [u32; DIRECTION_BINS],
    pub complexity: ShapeComplexity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyPointDistribution {
    pub horizontal_density: Vec<f64>,
    pub vertical_density: Vec<f64>,
    /// Top-left, top-right, bottom-left, bottom-right
    pub quadrant_density: Vec<f64>,
    /// Normalized by image width/height
    pub center_of_mass: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Symmetry {
    /// Mirror across the horizontal centre line
    pub horizontal: f64,
    /// Mirror across the vertical centre line
    pub vertical: f64,
    /// Point reflection through the centre
    pub diagonal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternFeatures {
    /// Strength-weighted line direction histogram
    pub line_directions: Vec<f64>,
    pub line_lengths: Vec<f64>,
    pub keypoint_distribution: KeyPointDistribution,
    pub symmetry: Symmetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpatialDistribution {
    pub top_half: f64,
    pub bottom_half: f64,
    pub left_half: f64,
    pub right_half: f64,
    pub center: f64,
    pub periphery: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpatialComplexity {
    pub average_distance: f64,
    pub standard_deviation: f64,
    /// Grid entropy normalized by log2(100)
    pub entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialFeatures {
    pub distribution: SpatialDistribution,
    pub complexity: SpatialComplexity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighLevelFeatures {
    pub shapes: ShapeFeatures,
    pub patterns: PatternFeatures,
    pub spatial: SpatialFeatures,
}

pub fn extract_high_level(mid: &MidLevelFeatures) -> HighLevelFeatures {
    HighLevelFeatures {
        shapes: extract_shapes(mid),
        patterns: extract_patterns(mid),
        spatial: extract_spatial(&mid.keypoints, mid.width, mid.height),
    }
}

/// Direction bin of a line's normal angle: ⌊θ / (π/8)⌋ mod 8
pub fn direction_bin(theta: f64) -> usize {
    ((theta / (PI / 8.0)).floor().max(0.0) as usize) % DIRECTION_BINS
}

pub fn extract_shapes(mid: &MidLevelFeatures) -> ShapeFeatures {
    let blobs = mid
        .blobs
        .iter()
        .map(|blob| {
            let (center_x, center_y) = blob.centroid();
            BlobShape {
                area: blob.area(),
                perimeter: blob.perimeter(),
                circularity: blob.circularity(),
                aspect_ratio: blob.aspect_ratio(),
                center_x,
                center_y,
            }
        })
        .collect();

    let mut line_directions = [0u32; DIRECTION_BINS];
    for line in &mid.lines {
        line_directions[direction_bin(line.theta)] += 1;
    }

    ShapeFeatures {
        basic: ShapeCounts {
            corner_count: mid.corners.len(),
            line_count: mid.lines.len(),
            blob_count: mid.blobs.len(),
            keypoint_count: mid.keypoints.len(),
        },
        blobs,
        line_directions,
        complexity: shape_complexity(mid),
    }
}

pub fn shape_complexity(mid: &MidLevelFeatures) -> ShapeComplexity {
    let keypoint_density = mid.keypoint_density();
    let corner_to_line_ratio = if mid.corners.is_empty() {
        0.0
    } else {
        mid.lines.len() as f64 / mid.corners.len() as f64
    };
    let complexity_score = ((keypoint_density * 10_000.0 + corner_to_line_ratio) / 10.0).min(1.0);

    ShapeComplexity {
        keypoint_density,
        corner_to_line_ratio,
        complexity_score,
    }
}

pub fn extract_patterns(mid: &MidLevelFeatures) -> PatternFeatures {
    PatternFeatures {
        line_directions: line_direction_histogram(&mid.lines),
        line_lengths: line_length_histogram(&mid.lines),
        keypoint_distribution: keypoint_distribution(&mid.keypoints, mid.width, mid.height),
        symmetry: detect_symmetry(&mid.keypoints, mid.width, mid.height),
    }
}

/// Scale to unit sum; left as-is (all zero) when the sum is 0.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        values.iter().map(|v| v / sum).collect()
    } else {
        values.to_vec()
    }
}

pub fn line_direction_histogram(lines: &[Line]) -> Vec<f64> {
    let mut histogram = vec![0.0; DIRECTION_BINS];
    for line in lines {
        histogram[direction_bin(line.theta)] += line.strength as f64;
    }
    normalize(&histogram)
}

pub fn line_length_histogram(lines: &[Line]) -> Vec<f64> {
    let mut histogram = vec![0.0; LENGTH_BINS];
    for line in lines {
        let bin = ((line.length() / LENGTH_BIN_WIDTH).floor() as usize).min(LENGTH_BINS - 1);
        histogram[bin] += 1.0;
    }
    normalize(&histogram)
}

fn density_bin(coord: u32, extent: u32) -> usize {
    let fraction = coord as f64 / extent.max(1) as f64;
    ((fraction * DENSITY_BINS as f64).floor() as usize).min(DENSITY_BINS - 1)
}

pub fn keypoint_distribution(keypoints: &[KeyPoint], width: u32, height: u32) -> KeyPointDistribution {
    if keypoints.is_empty() {
        return KeyPointDistribution {
            horizontal_density: vec![0.0; DENSITY_BINS],
            vertical_density: vec![0.0; DENSITY_BINS],
            quadrant_density: vec![0.0; 4],
            center_of_mass: (0.5, 0.5),
        };
    }

    let mut horizontal = vec![0.0; DENSITY_BINS];
    let mut vertical = vec![0.0; DENSITY_BINS];
    let mut quadrants = vec![0.0; 4];
    let (mut sum_x, mut sum_y) = (0.0, 0.0);
    let (half_w, half_h) = (width as f64 / 2.0, height as f64 / 2.0);

    for kp in keypoints {
        horizontal[density_bin(kp.x, width)] += 1.0;
        vertical[density_bin(kp.y, height)] += 1.0;
        let quadrant = usize::from(kp.x as f64 >= half_w) + 2 * usize::from(kp.y as f64 >= half_h);
        quadrants[quadrant] += 1.0;
        sum_x += kp.x as f64;
        sum_y += kp.y as f64;
    }

    let n = keypoints.len() as f64;
    KeyPointDistribution {
        horizontal_density: normalize(&horizontal),
        vertical_density: normalize(&vertical),
        quadrant_density: normalize(&quadrants),
        center_of_mass: (
            sum_x / n / width.max(1) as f64,
            sum_y / n / height.max(1) as f64,
        ),
    }
}

/// For every keypoint, find the keypoint nearest to its mirror image and
/// score `1 - min(1, distance / (0.1 · diagonal))`; average over keypoints.
pub fn detect_symmetry(keypoints: &[KeyPoint], width: u32, height: u32) -> Symmetry {
    if keypoints.is_empty() {
        return Symmetry::default();
    }

    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let diagonal = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
    let tolerance = (diagonal * 0.1).max(f64::MIN_POSITIVE);

    let nearest = |tx: f64, ty: f64| {
        keypoints
            .iter()
            .map(|o| ((o.x as f64 - tx).powi(2) + (o.y as f64 - ty).powi(2)).sqrt())
            .fold(f64::INFINITY, f64::min)
    };
    let score = |distance: f64| 1.0 - (distance / tolerance).min(1.0);

    let mut symmetry = Symmetry::default();
    for kp in keypoints {
        let (x, y) = (kp.x as f64, kp.y as f64);
        let mirrored_x = 2.0 * center_x - x;
        let mirrored_y = 2.0 * center_y - y;
        symmetry.horizontal += score(nearest(x, mirrored_y));
        symmetry.vertical += score(nearest(mirrored_x, y));
        symmetry.diagonal += score(nearest(mirrored_x, mirrored_y));
    }

    let n = keypoints.len() as f64;
    symmetry.horizontal /= n;
    symmetry.vertical /= n;
    symmetry.diagonal /= n;
    symmetry
}

pub fn extract_spatial(keypoints: &[KeyPoint], width: u32, height: u32) -> SpatialFeatures {
    if keypoints.is_empty() {
        return SpatialFeatures {
            distribution: SpatialDistribution {
                top_half: 0.5,
                bottom_half: 0.5,
                left_half: 0.5,
                right_half: 0.5,
                center: 0.5,
                periphery: 0.5,
            },
            complexity: SpatialComplexity::default(),
        };
    }

    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let center_radius = width.min(height) as f64 / 4.0;

    let mut counts = [0usize; 6];
    for kp in keypoints {
        let (x, y) = (kp.x as f64, kp.y as f64);
        counts[if y < center_y { 0 } else { 1 }] += 1;
        counts[if x < center_x { 2 } else { 3 }] += 1;
        let distance = ((x - center_x).powi(2) + (y - center_y).powi(2)).sqrt();
        counts[if distance < center_radius { 4 } else { 5 }] += 1;
    }

    let n = keypoints.len() as f64;
    let ratio = |i: usize| counts[i] as f64 / n;

    SpatialFeatures {
        distribution: SpatialDistribution {
            top_half: ratio(0),
            bottom_half: ratio(1),
            left_half: ratio(2),
            right_half: ratio(3),
            center: ratio(4),
            periphery: ratio(5),
        },
        complexity: spatial_complexity(keypoints, width, height),
    }
}

/// Mean and standard deviation of pairwise keypoint distances, and the
/// 10x10 occupancy-grid entropy normalized to [0, 1].
pub fn spatial_complexity(keypoints: &[KeyPoint], width: u32, height: u32) -> SpatialComplexity {
    if keypoints.len() < 2 {
        return SpatialComplexity::default();
    }

    let mut distances = Vec::with_capacity(keypoints.len() * (keypoints.len() - 1) / 2);
    for (i, a) in keypoints.iter().enumerate() {
        for b in &keypoints[i + 1..] {
            let dx = a.x as f64 - b.x as f64;
            let dy = a.y as f64 - b.y as f64;
            distances.push((dx * dx + dy * dy).sqrt());
        }
    }
    let count = distances.len() as f64;
    let average_distance = distances.iter().sum::<f64>() / count;
    let variance = distances.iter().map(|d| (d - average_distance).powi(2)).sum::<f64>() / count;

    let mut grid = [0u64; SPATIAL_GRID * SPATIAL_GRID];
    for kp in keypoints {
        let cell = |coord: u32, extent: u32| {
            let fraction = coord as f64 / extent.max(1) as f64;
            ((fraction * SPATIAL_GRID as f64).floor() as usize).min(SPATIAL_GRID - 1)
        };
        grid[cell(kp.y, height) * SPATIAL_GRID + cell(kp.x, width)] += 1;
    }
    let entropy = shannon_entropy(&grid, keypoints.len() as u64) / ((SPATIAL_GRID * SPATIAL_GRID) as f64).log2();

    SpatialComplexity {
        average_distance,
        standard_deviation: variance.sqrt(),
        entropy,
    }
}
