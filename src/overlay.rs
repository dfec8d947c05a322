use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::detection::edges::is_edge;
use crate::models::KeyPoint;

pub const KEYPOINT_RADIUS: i32 = 3;
const EDGE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const KEYPOINT_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Edge pixels in white on black, keypoints as red discs on top.
pub fn render_overlay(edges: &GrayImage, keypoints: &[KeyPoint]) -> RgbaImage {
    let (width, height) = edges.dimensions();
    let mut canvas = RgbaImage::from_fn(width, height, |x, y| {
        if is_edge(edges, x, y) { EDGE_COLOR } else { BACKGROUND }
    });

    for kp in keypoints {
        draw_filled_circle_mut(&mut canvas, (kp.x as i32, kp.y as i32), KEYPOINT_RADIUS, KEYPOINT_COLOR);
    }
    canvas
}
