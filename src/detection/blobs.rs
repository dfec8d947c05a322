use image::{GrayImage, ImageBuffer, Luma};
use imageproc::contrast::{self, ThresholdType};
use imageproc::region_labelling::{Connectivity, connected_components};
use std::collections::BTreeMap;

use crate::models::Blob;

/// Per-pixel component labels; 0 is background, components count from 1.
pub type LabelImage = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Label 4-connected foreground pixels (value > `threshold`).
///
/// Components that only join through a later pixel still share one label.
/// Labels are dense and numbered in raster order of each component's first
/// pixel.
pub fn label_components(gray: &GrayImage, threshold: u8) -> LabelImage {
    let binary = contrast::threshold(gray, threshold, ThresholdType::Binary);
    connected_components(&binary, Connectivity::Four, Luma([0u8]))
}

/// Aggregate a label image into blobs, sorted by label.
pub fn collect_blobs(labels: &LabelImage) -> Vec<Blob> {
    let mut regions: BTreeMap<u32, Blob> = BTreeMap::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue; // Skip background
        }

        regions
            .entry(label)
            .and_modify(|blob| {
                blob.min_x = blob.min_x.min(x);
                blob.min_y = blob.min_y.min(y);
                blob.max_x = blob.max_x.max(x);
                blob.max_y = blob.max_y.max(y);
                blob.pixel_count += 1;
                blob.sum_x += x as u64;
                blob.sum_y += y as u64;
            })
            .or_insert(Blob {
                label,
                min_x: x,
                min_y: y,
                max_x: x,
                max_y: y,
                pixel_count: 1,
                sum_x: x as u64,
                sum_y: y as u64,
            });
    }

    regions.into_values().collect()
}

/// Binarize, label and keep components with more than `min_area` pixels.
pub fn detect_blobs(gray: &GrayImage, threshold: u8, min_area: u32) -> Vec<Blob> {
    let labels = label_components(gray, threshold);
    collect_blobs(&labels)
        .into_iter()
        .filter(|b| b.pixel_count > min_area)
        .collect()
}
