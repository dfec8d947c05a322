use image::GrayImage;

use crate::models::Corner;

/// Harris detector parameters
#[derive(Debug, Clone, Copy)]
pub struct HarrisParams {
    pub k: f64,
    pub threshold: f64,
    pub suppression_radius: f64,
}

impl Default for HarrisParams {
    fn default() -> Self {
        Self {
            k: 0.04,
            threshold: 100_000.0,
            suppression_radius: 5.0,
        }
    }
}

/// Harris response det(M) - k·trace(M)² at every pixel at least two pixels
/// from the border, where M sums dx², dy², dx·dy over a 3x3 window of
/// central-difference gradients. Other pixels hold 0.
pub fn harris_response(gray: &GrayImage, k: f64) -> Vec<f64> {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    let mut response = vec![0.0; w * h];
    if w < 5 || h < 5 {
        return response;
    }

    let raw = gray.as_raw();
    let mut dx = vec![0i32; w * h];
    let mut dy = vec![0i32; w * h];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = y * w + x;
            dx[idx] = raw[idx + 1] as i32 - raw[idx - 1] as i32;
            dy[idx] = raw[idx + w] as i32 - raw[idx - w] as i32;
        }
    }

    for y in 2..h - 2 {
        for x in 2..w - 2 {
            let mut sxx = 0i64;
            let mut syy = 0i64;
            let mut sxy = 0i64;
            for wy in y - 1..=y + 1 {
                for wx in x - 1..=x + 1 {
                    let i = wy * w + wx;
                    let (gx, gy) = (dx[i] as i64, dy[i] as i64);
                    sxx += gx * gx;
                    syy += gy * gy;
                    sxy += gx * gy;
                }
            }
            let (sxx, syy, sxy) = (sxx as f64, syy as f64, sxy as f64);
            let det = sxx * syy - sxy * sxy;
            let trace = sxx + syy;
            response[y * w + x] = det - k * trace * trace;
        }
    }

    response
}

/// Harris corners after point-set non-maximum suppression.
///
/// Result is sorted by descending response; no two corners are closer than
/// `suppression_radius`.
pub fn detect_corners(gray: &GrayImage, params: &HarrisParams) -> Vec<Corner> {
    let width = gray.width() as usize;
    let response = harris_response(gray, params.k);

    let candidates: Vec<Corner> = response
        .iter()
        .enumerate()
        .filter(|(_, r)| **r > params.threshold)
        .map(|(idx, r)| Corner {
            x: (idx % width) as u32,
            y: (idx / width) as u32,
            response: *r,
        })
        .collect();

    suppress_corners(candidates, params.suppression_radius)
}

/// Greedy suppression: strongest first, drop anything within `radius` of an
/// already accepted corner.
pub fn suppress_corners(mut candidates: Vec<Corner>, radius: f64) -> Vec<Corner> {
    candidates.sort_by(|a, b| b.response.total_cmp(&a.response));

    let mut accepted: Vec<Corner> = Vec::new();
    for candidate in candidates {
        if accepted.iter().all(|c| c.distance_to(&candidate) >= radius) {
            accepted.push(candidate);
        }
    }
    accepted
}
