use serde::Serialize;

use crate::classifier::CharacterPatterns;
use crate::features::FeatureSet;
use crate::features::high_level::BlobShape;

/// Number of slots in every feature vector
pub const FEATURE_VECTOR_LEN: usize = 33;

/// Label of each feature vector slot, in order
pub const FEATURE_NAMES: [&str; FEATURE_VECTOR_LEN] = [
    "red_peak_1",
    "red_peak_2",
    "red_peak_3",
    "green_peak_1",
    "green_peak_2",
    "green_peak_3",
    "blue_peak_1",
    "blue_peak_2",
    "blue_peak_3",
    "hue_variance",
    "saturation_mean",
    "value_mean",
    "texture_contrast",
    "texture_energy",
    "texture_homogeneity",
    "texture_entropy",
    "keypoint_count",
    "corner_count",
    "line_count",
    "complexity_score",
    "horizontal_vertical_ratio",
    "horizontal_symmetry",
    "vertical_symmetry",
    "diagonal_symmetry",
    "center_of_mass_x",
    "center_of_mass_y",
    "top_half",
    "left_half",
    "center",
    "spatial_entropy",
    "person_detected",
    "person_coverage",
    "person_aspect_ratio",
];

/// Histogram peaks reported per color channel
const PEAKS_PER_CHANNEL: usize = 3;
/// A peak bin must hold more than this share of pixels
const PEAK_FLOOR: f64 = 0.01;

/// Per-category relevance scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureImportance {
    pub color: f64,
    pub texture: f64,
    pub edges: f64,
    pub corners: f64,
    pub shapes: f64,
    pub symmetry: f64,
    pub spatial: f64,
    pub semantic: f64,
}

/// The four bundles plus everything derived from them
#[derive(Debug, Clone)]
pub struct IntegratedFeatures {
    pub original: FeatureSet,
    pub vector: Vec<f64>,
    pub importance: FeatureImportance,
    pub patterns: CharacterPatterns,
}

pub fn integrate(features: FeatureSet) -> IntegratedFeatures {
    let vector = feature_vector(&features);
    let importance = feature_importance(&features);
    let patterns = character_patterns(&features);
    IntegratedFeatures {
        original: features,
        vector,
        importance,
        patterns,
    }
}

/// Strengths of the strongest local peaks, zero-padded to `PEAKS_PER_CHANNEL`.
pub fn histogram_peaks(histogram: &[f64]) -> [f64; PEAKS_PER_CHANNEL] {
    let mut peaks: Vec<f64> = histogram
        .windows(3)
        .filter(|w| w[1] > w[0] && w[1] > w[2] && w[1] > PEAK_FLOOR)
        .map(|w| w[1])
        .collect();
    peaks.sort_by(|a, b| b.total_cmp(a));

    let mut top = [0.0; PEAKS_PER_CHANNEL];
    for (slot, peak) in top.iter_mut().zip(peaks) {
        *slot = peak;
    }
    top
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Flat, fixed-order vector of representative scalars from all bundles.
///
/// The layout never changes: missing semantic data is zero-filled.
pub fn feature_vector(features: &FeatureSet) -> Vec<f64> {
    let low = &features.low_level;
    let mid = &features.mid_level;
    let high = &features.high_level;
    let person = &features.semantic.person;

    let mut vector = Vec::with_capacity(FEATURE_VECTOR_LEN);

    vector.extend(histogram_peaks(&low.histograms.r));
    vector.extend(histogram_peaks(&low.histograms.g));
    vector.extend(histogram_peaks(&low.histograms.b));
    vector.push(variance(&low.hsv.hue));
    vector.push(mean(&low.hsv.saturation));
    vector.push(mean(&low.hsv.value));
    vector.extend([
        low.texture.contrast,
        low.texture.energy,
        low.texture.homogeneity,
        low.texture.entropy,
    ]);

    vector.push(mid.keypoints.len() as f64 / 100.0);
    vector.push(mid.corners.len() as f64 / 50.0);
    vector.push(mid.lines.len() as f64 / 20.0);

    let directions = &high.shapes.line_directions;
    let horizontal = (directions[0] + directions[4]) as f64;
    let vertical = (directions[2] + directions[6]) as f64;
    vector.push(high.shapes.complexity.complexity_score);
    vector.push(horizontal / (vertical + 0.001));

    let symmetry = &high.patterns.symmetry;
    vector.extend([symmetry.horizontal, symmetry.vertical, symmetry.diagonal]);
    let (com_x, com_y) = high.patterns.keypoint_distribution.center_of_mass;
    vector.extend([com_x, com_y]);

    let distribution = &high.spatial.distribution;
    vector.extend([distribution.top_half, distribution.left_half, distribution.center]);
    vector.push(high.spatial.complexity.entropy);

    vector.extend([
        if person.detected { 1.0 } else { 0.0 },
        person.coverage,
        person.aspect_ratio,
    ]);

    // Guard against anything non-finite slipping through
    for value in vector.iter_mut() {
        if !value.is_finite() {
            *value = 0.0;
        }
    }
    vector
}

pub fn feature_importance(features: &FeatureSet) -> FeatureImportance {
    let low = &features.low_level;
    let mid = &features.mid_level;
    let high = &features.high_level;
    let person = &features.semantic.person;
    let unit = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };

    FeatureImportance {
        color: unit(low.dominant_colors.len() as f64 * 0.2),
        texture: unit((low.texture.contrast + low.texture.entropy) / 2.0),
        edges: unit(mid.edge_fraction() * 10.0),
        corners: unit(mid.corners.len() as f64 / 50.0),
        shapes: unit(high.shapes.complexity.complexity_score),
        symmetry: unit(high.patterns.symmetry.horizontal.max(high.patterns.symmetry.vertical)),
        spatial: unit(high.spatial.complexity.entropy),
        semantic: if person.detected { unit(person.coverage * 2.0) } else { 0.0 },
    }
}

/// Pattern descriptor for the classifier.
///
/// Aspect ratio comes from the largest blob, else from the detected person,
/// else 1.
pub fn character_patterns(features: &FeatureSet) -> CharacterPatterns {
    let mid = &features.mid_level;
    let shapes = &features.high_level.shapes;
    let symmetry = &features.high_level.patterns.symmetry;
    let person = &features.semantic.person;

    let directions = shapes.line_directions.map(f64::from);
    let (horizontal_lines, vertical_lines, diagonal_lines) = CharacterPatterns::line_totals(&directions);

    let largest_blob = shapes
        .blobs
        .iter()
        .fold(None, |best: Option<&BlobShape>, blob| match best {
            Some(b) if blob.area <= b.area => Some(b),
            _ => Some(blob),
        });
    let aspect_ratio = match largest_blob {
        Some(blob) => blob.aspect_ratio,
        None if person.detected => person.aspect_ratio,
        None => 1.0,
    };

    CharacterPatterns {
        horizontal_lines,
        vertical_lines,
        diagonal_lines,
        curves: (mid.corners.len() as f64 / 20.0).min(1.0),
        symmetry_x: symmetry.horizontal,
        symmetry_y: symmetry.vertical,
        aspect_ratio,
        complexity: shapes.complexity.complexity_score,
        density: mid.keypoint_density(),
        keypoint_count: mid.keypoints.len(),
    }
}
