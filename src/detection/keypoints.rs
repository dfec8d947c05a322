use image::GrayImage;

use crate::models::{KeyPoint, SegmentationMask};

/// One keypoint per grid cell: the first pixel (raster order) with the
/// cell's maximum edge strength, kept if that strength exceeds `strength_floor`.
/// Pixels outside the mask are ignored.
pub fn extract_keypoints(
    edges: &GrayImage,
    grid_size: u32,
    strength_floor: u8,
    mask: Option<&SegmentationMask>,
) -> Vec<KeyPoint> {
    let (width, height) = edges.dimensions();
    let grid_size = grid_size.max(1);
    let mut keypoints = Vec::new();

    for cell_y in (0..height).step_by(grid_size as usize) {
        for cell_x in (0..width).step_by(grid_size as usize) {
            let mut best: Option<KeyPoint> = None;

            for y in cell_y..(cell_y + grid_size).min(height) {
                for x in cell_x..(cell_x + grid_size).min(width) {
                    if mask.is_some_and(|m| !m.contains(x, y)) {
                        continue;
                    }
                    let strength = edges.get_pixel(x, y)[0];
                    if best.is_none_or(|kp| strength > kp.strength) {
                        best = Some(KeyPoint { x, y, strength });
                    }
                }
            }

            if let Some(kp) = best.filter(|kp| kp.strength > strength_floor) {
                keypoints.push(kp);
            }
        }
    }

    keypoints
}

/// Grid cell index of a keypoint, for checking the one-per-cell rule.
pub fn cell_of(kp: &KeyPoint, grid_size: u32) -> (u32, u32) {
    let grid_size = grid_size.max(1);
    (kp.x / grid_size, kp.y / grid_size)
}
