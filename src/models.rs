use serde::Serialize;

/// Per-pixel foreground mask, row-major, same dimensions as the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl SegmentationMask {
    /// Mask that includes every pixel. Used whenever segmentation is unavailable.
    pub fn all(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![true; width as usize * height as usize],
        }
    }

    /// Returns `None` when `data` does not hold exactly `width * height` entries.
    pub fn from_vec(width: u32, height: u32, data: Vec<bool>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Out-of-range coordinates are never masked in.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

/// Strongest edge pixel of one keypoint grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyPoint {
    pub x: u32,
    pub y: u32,
    pub strength: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Corner {
    pub x: u32,
    pub y: u32,
    pub response: f64,
}

impl Corner {
    pub fn distance_to(&self, other: &Corner) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Connected set of foreground pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blob {
    pub label: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub pixel_count: u32,
    pub sum_x: u64,
    pub sum_y: u64,
}

impl Blob {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn area(&self) -> u32 {
        self.pixel_count
    }

    pub fn centroid(&self) -> (f64, f64) {
        let n = self.pixel_count.max(1) as f64;
        (self.sum_x as f64 / n, self.sum_y as f64 / n)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height().max(1) as f64
    }

    /// Perimeter of the ellipse inscribed in the bounding box, using the
    /// quadratic-mean radius approximation.
    pub fn perimeter(&self) -> f64 {
        let w = self.width() as f64;
        let h = self.height() as f64;
        2.0 * std::f64::consts::PI * ((w * w + h * h) / 8.0).sqrt()
    }

    /// 4π·area / perimeter². 1.0 for a filled disc.
    pub fn circularity(&self) -> f64 {
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return 0.0;
        }
        4.0 * std::f64::consts::PI * self.area() as f64 / (perimeter * perimeter)
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Hough line clipped to the image rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    /// Normal angle in radians, in [0, π)
    pub theta: f64,
    /// Signed distance of the line from the origin along its normal
    pub rho: f64,
    /// Accumulator votes
    pub strength: u32,
}

impl Line {
    pub fn length(&self) -> f64 {
        let dx = self.x2 as f64 - self.x1 as f64;
        let dy = self.y2 as f64 - self.y1 as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Inclusive pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub width: u32,
    pub height: u32,
}
