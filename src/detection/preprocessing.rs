use image::{GrayImage, Luma, RgbaImage};
use imageproc::definitions::Image;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Convert to grayscale with the fixed luma weights 0.299R + 0.587G + 0.114B.
///
/// `image`'s own `to_luma8` uses Rec. 709 weights, which would shift every
/// downstream threshold, so the conversion is done here.
pub fn to_grayscale(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, _] = img.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let value = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    value.round().min(255.0) as u8
}

/// 3x3 Gaussian smoothing with kernel [[1,2,1],[2,4,2],[1,2,1]] / 16.
/// Border pixels are copied unsmoothed.
pub fn gaussian_blur_3x3(gray: &GrayImage) -> GrayImage {
    const KERNEL: [[u32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

    let (width, height) = gray.dimensions();
    let mut smoothed = gray.clone();
    if width < 3 || height < 3 {
        return smoothed;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = 0u32;
            for (ky, row) in KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let px = gray.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1)[0] as u32;
                    sum += px * weight;
                }
            }
            // Rounded division by the kernel sum
            smoothed.put_pixel(x, y, Luma([((sum + 8) / 16) as u8]));
        }
    }

    smoothed
}

/// Sobel gradient field. Border pixels have zero magnitude.
#[derive(Debug, Clone)]
pub struct Gradient {
    /// sqrt(gx² + gy²), clamped to 255
    pub magnitude: GrayImage,
    /// Gradient angle quantized into 8 compass bins; bin `d` covers the
    /// angle `d * 45° - 180°`
    pub direction: Vec<u8>,
}

impl Gradient {
    pub fn direction_at(&self, x: u32, y: u32) -> u8 {
        self.direction[y as usize * self.magnitude.width() as usize + x as usize]
    }
}

/// Raw horizontal and vertical Sobel responses.
pub fn sobel_components(gray: &GrayImage) -> (Image<Luma<i16>>, Image<Luma<i16>>) {
    (horizontal_sobel(gray), vertical_sobel(gray))
}

pub fn sobel(gray: &GrayImage) -> Gradient {
    let (width, height) = gray.dimensions();
    let mut magnitude = GrayImage::new(width, height);
    let mut direction = vec![0u8; width as usize * height as usize];
    if width < 3 || height < 3 {
        return Gradient { magnitude, direction };
    }

    let (gx, gy) = sobel_components(gray);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let (gx, gy) = (gx.get_pixel(x, y)[0] as f64, gy.get_pixel(x, y)[0] as f64);
            let g = (gx * gx + gy * gy).sqrt();
            magnitude.put_pixel(x, y, Luma([g.min(255.0) as u8]));
            direction[y as usize * width as usize + x as usize] = quantize_direction(gy.atan2(gx));
        }
    }

    Gradient { magnitude, direction }
}

/// Map an angle in [-π, π] onto 8 compass bins.
pub fn quantize_direction(angle: f64) -> u8 {
    let turns = (angle + std::f64::consts::PI) / (2.0 * std::f64::consts::PI);
    ((turns * 8.0).round() as u32 % 8) as u8
}

/// Keep a pixel's magnitude only where it is at least as large as both
/// neighbours along its quantized gradient direction.
pub fn non_max_suppression(gradient: &Gradient) -> GrayImage {
    let (width, height) = gradient.magnitude.dimensions();
    let mut suppressed = GrayImage::new(width, height);
    if width < 3 || height < 3 {
        return suppressed;
    }

    let mag = |x: u32, y: u32| gradient.magnitude.get_pixel(x, y)[0];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let current = mag(x, y);
            let ((x1, y1), (x2, y2)) = match gradient.direction_at(x, y) {
                // ±180° / 0°: horizontal gradient
                0 | 4 => ((x - 1, y), (x + 1, y)),
                // -135° / 45°: gradient along the main diagonal
                1 | 5 => ((x - 1, y - 1), (x + 1, y + 1)),
                // ±90°: vertical gradient
                2 | 6 => ((x, y - 1), (x, y + 1)),
                // -45° / 135°: gradient along the anti-diagonal
                _ => ((x + 1, y - 1), (x - 1, y + 1)),
            };
            if current >= mag(x1, y1) && current >= mag(x2, y2) {
                suppressed.put_pixel(x, y, Luma([current]));
            }
        }
    }

    suppressed
}
