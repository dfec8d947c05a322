use image::GrayImage;
use std::f64::consts::PI;

use crate::detection::edges::{count_edge_pixels, is_edge};
use crate::error::ExtractionError;
use crate::models::Line;

/// |sin θ| or |cos θ| below this is treated as an axis-aligned line
pub const AXIS_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct HoughParams {
    pub theta_bins: usize,
    pub rho_bins: usize,
    pub vote_threshold: u32,
    pub max_lines: usize,
    pub max_edge_pixels: Option<usize>,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            theta_bins: 180,
            rho_bins: 180,
            vote_threshold: 50,
            max_lines: 20,
            max_edge_pixels: None,
        }
    }
}

/// Vote accumulator over (ρ, θ), ρ-major.
#[derive(Debug, Clone)]
pub struct HoughAccumulator {
    pub rho_bins: usize,
    pub theta_bins: usize,
    pub max_rho: f64,
    pub votes: Vec<u32>,
}

impl HoughAccumulator {
    pub fn get(&self, r: usize, t: usize) -> u32 {
        self.votes[r * self.theta_bins + t]
    }

    fn rho_scale(&self) -> f64 {
        self.rho_bins as f64 / (2.0 * self.max_rho).max(f64::MIN_POSITIVE)
    }

    pub fn theta(&self, t: usize) -> f64 {
        t as f64 * PI / self.theta_bins as f64
    }

    /// Centre of ρ bin `r`
    pub fn rho(&self, r: usize) -> f64 {
        (r as f64 + 0.5) / self.rho_scale() - self.max_rho
    }

    /// Bins above `threshold` that strictly exceed all 8 neighbours.
    /// Border bins are never reported.
    pub fn local_maxima(&self, threshold: u32) -> Vec<(usize, usize, u32)> {
        let mut peaks = Vec::new();
        if self.rho_bins < 3 || self.theta_bins < 3 {
            return peaks;
        }
        for r in 1..self.rho_bins - 1 {
            for t in 1..self.theta_bins - 1 {
                let value = self.get(r, t);
                if value <= threshold {
                    continue;
                }
                let dominant = (r - 1..=r + 1)
                    .flat_map(|nr| (t - 1..=t + 1).map(move |nt| (nr, nt)))
                    .filter(|&(nr, nt)| nr != r || nt != t)
                    .all(|(nr, nt)| self.get(nr, nt) < value);
                if dominant {
                    peaks.push((r, t, value));
                }
            }
        }
        peaks
    }
}

/// Every edge pixel votes once per θ bin with ρ = x·cosθ + y·sinθ.
pub fn hough_accumulate(edges: &GrayImage, theta_bins: usize, rho_bins: usize) -> HoughAccumulator {
    let (width, height) = edges.dimensions();
    let max_rho = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
    let mut acc = HoughAccumulator {
        rho_bins,
        theta_bins,
        max_rho,
        votes: vec![0; rho_bins * theta_bins],
    };
    if width == 0 || height == 0 {
        return acc;
    }

    let rho_scale = acc.rho_scale();
    let trig: Vec<(f64, f64)> = (0..theta_bins)
        .map(|t| {
            let theta = acc.theta(t);
            (theta.cos(), theta.sin())
        })
        .collect();

    for y in 0..height {
        for x in 0..width {
            if !is_edge(edges, x, y) {
                continue;
            }
            for (t, (cos, sin)) in trig.iter().enumerate() {
                let rho = x as f64 * cos + y as f64 * sin;
                let r = ((rho + max_rho) * rho_scale).floor();
                if r >= 0.0 && (r as usize) < rho_bins {
                    acc.votes[r as usize * theta_bins + t] += 1;
                }
            }
        }
    }

    acc
}

/// Clip the line x·cosθ + y·sinθ = ρ to [0, width) × [0, height).
///
/// Axis-aligned lines are handled directly. Otherwise the line is
/// intersected with all four borders and the two farthest in-bounds
/// intersections become the endpoints. Returns `None` if the line misses
/// the image.
pub fn clip_line(theta: f64, rho: f64, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let (sin, cos) = theta.sin_cos();
    let max_x = (width - 1) as f64;
    let max_y = (height - 1) as f64;
    let in_x = |x: f64| (0.0..=max_x).contains(&x);
    let in_y = |y: f64| (0.0..=max_y).contains(&y);

    if sin.abs() < AXIS_EPSILON {
        let x = (rho / cos).round();
        return in_x(x).then(|| (x as u32, 0, x as u32, height - 1));
    }
    if cos.abs() < AXIS_EPSILON {
        let y = (rho / sin).round();
        return in_y(y).then(|| (0, y as u32, width - 1, y as u32));
    }

    let mut points: Vec<(f64, f64)> = Vec::with_capacity(4);
    for x in [0.0, max_x] {
        let y = ((rho - x * cos) / sin).round();
        if in_y(y) {
            points.push((x, y));
        }
    }
    for y in [0.0, max_y] {
        let x = ((rho - y * sin) / cos).round();
        if in_x(x) {
            points.push((x, y));
        }
    }

    let mut best: Option<((f64, f64), (f64, f64), f64)> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2);
            if best.is_none_or(|(_, _, bd)| d > bd) {
                best = Some((*a, *b, d));
            }
        }
    }

    best.map(|(a, b, _)| (a.0 as u32, a.1 as u32, b.0 as u32, b.1 as u32))
}

/// Hough line detection over a binary edge map.
///
/// Returns at most `max_lines` lines sorted by descending vote count. Fails
/// only when the edge map exceeds the configured edge-pixel budget.
pub fn detect_lines(edges: &GrayImage, params: &HoughParams) -> Result<Vec<Line>, ExtractionError> {
    if let Some(budget) = params.max_edge_pixels {
        let edge_pixels = count_edge_pixels(edges);
        if edge_pixels > budget {
            return Err(ExtractionError::HoughBudgetExceeded { edge_pixels, budget });
        }
    }

    let (width, height) = edges.dimensions();
    let acc = hough_accumulate(edges, params.theta_bins, params.rho_bins);

    let mut lines: Vec<Line> = acc
        .local_maxima(params.vote_threshold)
        .into_iter()
        .filter_map(|(r, t, strength)| {
            let theta = acc.theta(t);
            let rho = acc.rho(r);
            clip_line(theta, rho, width, height).map(|(x1, y1, x2, y2)| Line {
                x1,
                y1,
                x2,
                y2,
                theta,
                rho,
                strength,
            })
        })
        .collect();

    lines.sort_by(|a, b| b.strength.cmp(&a.strength));
    lines.truncate(params.max_lines);
    Ok(lines)
}
