use glyphcast::SegmentationMask;
use image::{GrayImage, Luma, Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Image with every pixel set to the same gray level.
pub fn uniform_gray(width: u32, height: u32, level: u8) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([level, level, level, 255]))
}

/// White bar spanning the full width between rows `top` and `bottom`
/// (inclusive) on black.
pub fn horizontal_bar(width: u32, height: u32, top: u32, bottom: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| if (top..=bottom).contains(&y) { WHITE } else { BLACK })
}

/// The 100x60 bar used across the suite: rows 25..=34.
pub fn standard_bar() -> RgbaImage {
    horizontal_bar(100, 60, 25, 34)
}

/// White square covering `[start, end]` on both axes, on black.
pub fn filled_square(size: u32, start: u32, end: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (start..=end).contains(&x) && (start..=end).contains(&y) { WHITE } else { BLACK }
    })
}

/// A U: two 6px arms that only meet through the bottom stroke, so a
/// raster scan sees them as separate runs until the last rows.
pub fn u_shape(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let left_arm = (4..10).contains(&x) && (4..height - 4).contains(&y);
        let right_arm = (width - 10..width - 4).contains(&x) && (4..height - 4).contains(&y);
        let bottom = (4..width - 4).contains(&x) && (height - 10..height - 4).contains(&y);
        if left_arm || right_arm || bottom { Luma([255]) } else { Luma([0]) }
    })
}

/// Alternating black and white squares of side `cell`.
pub fn checkerboard(size: u32, cell: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 { Luma([255]) } else { Luma([0]) }
    })
}

pub fn gray_of(img: &RgbaImage) -> GrayImage {
    glyphcast::detection::preprocessing::to_grayscale(img)
}

/// Mask covering only the left half of the image.
pub fn left_half_mask(width: u32, height: u32) -> SegmentationMask {
    SegmentationMask::from_fn(width, height, |x, _| x < width / 2)
}
