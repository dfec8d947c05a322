mod common;

use common::*;
use glyphcast::detection::edges::{count_edge_pixels, detect_edges, edge_fraction, EDGE_VALUE};
use glyphcast::detection::preprocessing::{gaussian_blur_3x3, luma, quantize_direction, sobel};
use imageproc::gradients::sobel_gradients;
use image::{GrayImage, Luma};
use std::collections::BTreeSet;
use std::f64::consts::PI;

#[test]
fn test_uniform_image_has_no_edges() {
    let edges = detect_edges(&gray_of(&uniform_gray(50, 50, 90)), 50, None);
    assert_eq!(count_edge_pixels(&edges), 0);
}

#[test]
fn test_bar_edges_follow_both_borders() {
    let edges = detect_edges(&gray_of(&standard_bar()), 50, None);

    assert!(edges.pixels().all(|p| p[0] == 0 || p[0] == EDGE_VALUE));

    let rows: BTreeSet<u32> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] > 0)
        .map(|(_, y, _)| y)
        .collect();
    assert_eq!(rows, BTreeSet::from([23, 24, 25, 26, 33, 34, 35, 36]));
}

#[test]
fn test_mask_restricts_edges() {
    let img = standard_bar();
    let mask = left_half_mask(img.width(), img.height());
    let edges = detect_edges(&gray_of(&img), 50, Some(&mask));

    assert!(count_edge_pixels(&edges) > 0);
    for (x, _, p) in edges.enumerate_pixels() {
        if x >= 50 {
            assert_eq!(p[0], 0);
        }
    }
}

#[test]
fn test_threshold_is_strict() {
    let gray = gray_of(&standard_bar());
    let loose = count_edge_pixels(&detect_edges(&gray, 50, None));
    let strict = count_edge_pixels(&detect_edges(&gray, 254, None));
    let none = count_edge_pixels(&detect_edges(&gray, 255, None));

    assert!(strict <= loose);
    assert_eq!(none, 0);
}

#[test]
fn test_tiny_images() {
    let edges = detect_edges(&GrayImage::new(2, 2), 50, None);
    assert_eq!(count_edge_pixels(&edges), 0);
    assert_eq!(edge_fraction(&GrayImage::new(0, 0)), 0.0);
}

#[test]
fn test_blur_keeps_border_and_rounds() {
    let gray = GrayImage::from_fn(3, 3, |x, y| if (x, y) == (1, 1) { Luma([16]) } else { Luma([0]) });
    let blurred = gaussian_blur_3x3(&gray);

    // (16 * 4 + 8) / 16
    assert_eq!(blurred.get_pixel(1, 1)[0], 4);
    assert_eq!(blurred.get_pixel(0, 0)[0], 0);
}

#[test]
fn test_sobel_magnitude_saturates() {
    let gray = GrayImage::from_fn(5, 5, |x, _| if x < 2 { Luma([0]) } else { Luma([255]) });
    let gradient = sobel(&gray);

    assert_eq!(gradient.magnitude.get_pixel(2, 2)[0], 255);
    assert_eq!(gradient.magnitude.get_pixel(0, 2)[0], 0);
}

#[test]
fn test_luma_weights() {
    assert_eq!(luma(255, 255, 255), 255);
    assert_eq!(luma(255, 0, 0), 76);
    assert_eq!(luma(0, 255, 0), 150);
    assert_eq!(luma(0, 0, 255), 29);
}

#[test]
fn test_quantize_direction() {
    assert_eq!(quantize_direction(-PI), 0);
    assert_eq!(quantize_direction(0.0), 4);
    assert_eq!(quantize_direction(PI / 2.0), 6);
    assert_eq!(quantize_direction(PI), 0);
}

#[test]
fn test_sobel_matches_reference_gradients() {
    let board = gaussian_blur_3x3(&checkerboard(32, 4));
    let gradient = sobel(&board);
    let reference = sobel_gradients(&board);

    for y in 1..31 {
        for x in 1..31 {
            let expected = reference.get_pixel(x, y)[0].min(255) as u8;
            assert_eq!(gradient.magnitude.get_pixel(x, y)[0], expected, "at ({x}, {y})");
        }
    }
    // Borders stay zero
    assert!((0..32).all(|i| gradient.magnitude.get_pixel(i, 0)[0] == 0 && gradient.magnitude.get_pixel(0, i)[0] == 0));
}
