mod common;

use common::*;
use glyphcast::features::low_level::{extract_low_level, rgb_to_hsv, shannon_entropy, HUE_BINS, SV_BINS};
use image::RgbaImage;

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[test]
fn test_histograms_are_normalized() {
    let features = extract_low_level(&standard_bar());

    for histogram in [&features.histograms.r, &features.histograms.g, &features.histograms.b] {
        assert_eq!(histogram.len(), 256);
        assert!((sum(histogram) - 1.0).abs() < 1e-9);
    }
    assert_eq!(features.hsv.hue.len(), HUE_BINS);
    assert_eq!(features.hsv.saturation.len(), SV_BINS);
    assert_eq!(features.hsv.value.len(), SV_BINS);
    assert!((sum(&features.hsv.hue) - 1.0).abs() < 1e-9);
    assert!((sum(&features.hsv.value) - 1.0).abs() < 1e-9);

    // 1000 of 6000 pixels are white
    assert!((features.histograms.r[255] - 1.0 / 6.0).abs() < 1e-9);
    assert!((features.histograms.r[0] - 5.0 / 6.0).abs() < 1e-9);
}

#[test]
fn test_uniform_image_statistics() {
    let features = extract_low_level(&uniform_gray(40, 30, 128));

    assert_eq!(features.histograms.g[128], 1.0);
    assert_eq!(features.hsv.hue[0], 1.0);
    assert_eq!(features.hsv.saturation[0], 1.0);
    assert_eq!(features.hsv.value[50], 1.0);

    assert_eq!(features.dominant_colors.len(), 1);
    let color = features.dominant_colors[0];
    assert_eq!((color.r, color.g, color.b), (132, 132, 132));
    assert!((color.frequency - 1.0).abs() < 1e-12);

    assert_eq!(features.texture.contrast, 0.0);
    assert_eq!(features.texture.homogeneity, 1.0);
    assert_eq!(features.texture.entropy, 0.0);
}

#[test]
fn test_dominant_colors_ranked_and_capped() {
    let img = RgbaImage::from_fn(30, 10, |x, _| match x {
        0..=14 => image::Rgba([200, 10, 10, 255]),
        15..=24 => image::Rgba([10, 200, 10, 255]),
        _ => image::Rgba([10, 10, 200, 255]),
    });
    let colors = extract_low_level(&img).dominant_colors;

    assert!(colors.len() <= 5);
    assert!(colors.windows(2).all(|w| w[0].frequency >= w[1].frequency));
}

#[test]
fn test_two_level_entropy() {
    let img = RgbaImage::from_fn(10, 10, |x, _| if x < 5 { BLACK } else { WHITE });
    let texture = extract_low_level(&img).texture;

    assert!((texture.entropy - 1.0).abs() < 1e-12);
    assert!(texture.contrast > 0.0);
    assert!(texture.homogeneity < 1.0);
}

#[test]
fn test_rgb_to_hsv_primaries() {
    assert_eq!(rgb_to_hsv(255, 0, 0), (0.0, 1.0, 1.0));
    assert_eq!(rgb_to_hsv(0, 255, 0).0, 120.0);
    assert_eq!(rgb_to_hsv(0, 0, 255).0, 240.0);
    assert_eq!(rgb_to_hsv(255, 0, 255).0, 300.0);
    assert_eq!(rgb_to_hsv(0, 0, 0), (0.0, 0.0, 0.0));
}

#[test]
fn test_hue_stays_in_range() {
    for r in (0..=255).step_by(15) {
        for g in (0..=255).step_by(15) {
            for b in (0..=255).step_by(15) {
                let (h, s, v) = rgb_to_hsv(r as u8, g as u8, b as u8);
                assert!((0.0..360.0).contains(&h), "hue {h} for ({r}, {g}, {b})");
                assert!((0.0..=1.0).contains(&s));
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}

#[test]
fn test_empty_image_yields_zeros() {
    let features = extract_low_level(&RgbaImage::new(0, 0));

    assert!(features.histograms.r.iter().all(|&v| v == 0.0));
    assert!(features.hsv.hue.iter().all(|&v| v == 0.0));
    assert!(features.dominant_colors.is_empty());
    assert_eq!(features.texture.entropy, 0.0);
    assert_eq!(features.texture.energy, 0.0);
}

#[test]
fn test_shannon_entropy() {
    assert_eq!(shannon_entropy(&[0, 0], 0), 0.0);
    assert_eq!(shannon_entropy(&[4, 0, 0], 4), 0.0);
    assert!((shannon_entropy(&[1, 1, 1, 1], 4) - 2.0).abs() < 1e-12);
}
