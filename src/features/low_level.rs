use image::{GrayImage, RgbaImage};
use serde::Serialize;

use crate::detection::preprocessing::to_grayscale;

pub const HUE_BINS: usize = 360;
pub const SV_BINS: usize = 101;
pub const MAX_DOMINANT_COLORS: usize = 5;
/// Width of a dominant-color bucket along each channel
const COLOR_BUCKET: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorHistograms {
    pub r: Vec<f64>,
    pub g: Vec<f64>,
    pub b: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HsvDistribution {
    /// Degrees, 360 bins
    pub hue: Vec<f64>,
    /// Percent, 101 bins
    pub saturation: Vec<f64>,
    /// Percent, 101 bins
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DominantColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Estimated joint frequency (product of per-channel bucket frequencies)
    pub frequency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextureFeatures {
    pub contrast: f64,
    pub energy: f64,
    pub homogeneity: f64,
    pub entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowLevelFeatures {
    pub histograms: ColorHistograms,
    pub hsv: HsvDistribution,
    pub dominant_colors: Vec<DominantColor>,
    pub texture: TextureFeatures,
}

/// Color and texture statistics of the whole image.
pub fn extract_low_level(img: &RgbaImage) -> LowLevelFeatures {
    let mut hist_r = vec![0u64; 256];
    let mut hist_g = vec![0u64; 256];
    let mut hist_b = vec![0u64; 256];
    let mut hue = vec![0u64; HUE_BINS];
    let mut saturation = vec![0u64; SV_BINS];
    let mut value = vec![0u64; SV_BINS];

    for pixel in img.pixels() {
        let [r, g, b, _] = pixel.0;
        hist_r[r as usize] += 1;
        hist_g[g as usize] += 1;
        hist_b[b as usize] += 1;

        let (h, s, v) = rgb_to_hsv(r, g, b);
        hue[(h as usize).min(HUE_BINS - 1)] += 1;
        saturation[((s * 100.0).floor() as usize).min(SV_BINS - 1)] += 1;
        value[((v * 100.0).floor() as usize).min(SV_BINS - 1)] += 1;
    }

    let pixel_count = img.width() as usize * img.height() as usize;
    let dominant_colors = dominant_colors(&hist_r, &hist_g, &hist_b, MAX_DOMINANT_COLORS);
    let texture = texture_features(&to_grayscale(img));

    LowLevelFeatures {
        histograms: ColorHistograms {
            r: normalize_by(&hist_r, pixel_count),
            g: normalize_by(&hist_g, pixel_count),
            b: normalize_by(&hist_b, pixel_count),
        },
        hsv: HsvDistribution {
            hue: normalize_by(&hue, pixel_count),
            saturation: normalize_by(&saturation, pixel_count),
            value: normalize_by(&value, pixel_count),
        },
        dominant_colors,
        texture,
    }
}

/// Divide every count by `total`; all zeros when `total` is 0.
pub fn normalize_by(counts: &[u64], total: usize) -> Vec<f64> {
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Hue in whole degrees [0, 360), saturation and value in [0, 1].
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let v = max;

    let mut h = 0.0;
    if delta != 0.0 {
        h = if max == r {
            ((g - b) / delta) % 6.0
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h = (h * 60.0).round();
        if h < 0.0 {
            h += 360.0;
        }
        if h >= 360.0 {
            h -= 360.0;
        }
    }

    (h, s, v)
}

/// Rank 8-wide RGB buckets by the product of their per-channel frequencies
/// and return the top `max_colors` (bucket centres).
///
/// The per-channel histograms are treated as independent, so a bucket's
/// estimate is the product of the three channel sums over the bucket.
pub fn dominant_colors(hist_r: &[u64], hist_g: &[u64], hist_b: &[u64], max_colors: usize) -> Vec<DominantColor> {
    let total: u64 = hist_r.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    let bucket_sums = |hist: &[u64]| -> Vec<f64> {
        hist.chunks(COLOR_BUCKET)
            .map(|chunk| chunk.iter().sum::<u64>() as f64 / total as f64)
            .collect()
    };
    let (sums_r, sums_g, sums_b) = (bucket_sums(hist_r), bucket_sums(hist_g), bucket_sums(hist_b));
    let center = |bucket: usize| (bucket * COLOR_BUCKET + COLOR_BUCKET / 2).min(255) as u8;

    let mut colors = Vec::new();
    for (ri, fr) in sums_r.iter().enumerate() {
        for (gi, fg) in sums_g.iter().enumerate() {
            for (bi, fb) in sums_b.iter().enumerate() {
                let frequency = fr * fg * fb;
                if frequency > 0.0 {
                    colors.push(DominantColor {
                        r: center(ri),
                        g: center(gi),
                        b: center(bi),
                        frequency,
                    });
                }
            }
        }
    }

    // Stable sort keeps bucket scan order among ties
    colors.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
    colors.truncate(max_colors);
    colors
}

/// Contrast, energy and homogeneity from right/down neighbour differences,
/// plus Shannon entropy of the 256-bin grayscale histogram.
pub fn texture_features(gray: &GrayImage) -> TextureFeatures {
    let (width, height) = gray.dimensions();
    let pixel_count = width as usize * height as usize;
    if pixel_count == 0 {
        return TextureFeatures::default();
    }

    let mut contrast = 0.0;
    let mut energy = 0.0;
    let mut homogeneity = 0.0;

    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let val = gray.get_pixel(x, y)[0] as f64;
            let diff_h = (val - gray.get_pixel(x + 1, y)[0] as f64).abs();
            let diff_v = (val - gray.get_pixel(x, y + 1)[0] as f64).abs();

            contrast += diff_h * diff_h + diff_v * diff_v;
            energy += val * val;
            homogeneity += 1.0 / (1.0 + diff_h) + 1.0 / (1.0 + diff_v);
        }
    }

    let pairs = (width.saturating_sub(1) as usize * height.saturating_sub(1) as usize * 2).max(1) as f64;
    contrast /= pairs;
    energy /= pixel_count as f64;
    homogeneity /= pairs;

    let mut histogram = [0u64; 256];
    for p in gray.pixels() {
        histogram[p[0] as usize] += 1;
    }
    let entropy = shannon_entropy(&histogram, pixel_count as u64);

    TextureFeatures {
        contrast,
        energy,
        homogeneity,
        entropy,
    }
}

/// -Σ p·log2(p) over non-empty bins.
pub fn shannon_entropy(counts: &[u64], total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}
