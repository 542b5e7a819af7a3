//! Fast-Gaussian peak fitter: a linearized 2D Gaussian peak fit via
//! column-pivoted QR least squares.
//!
//! Works better with large clusters; it discards the bottom half of the
//! hits by ToT, so it needs at least 8 hits to leave anything to fit.

use nalgebra::{linalg::ColPivQR, DMatrix, DVector};
use rustpix_core::{Hit, NeutronEvent, PeakFitter};

/// Minimum cluster size the fit will attempt; below this it returns the
/// failure sentinel immediately.
const MIN_HITS: usize = 8;

/// Fast-Gaussian peak fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastGaussianFitter {
    /// Coordinate multiplier applied before fitting.
    pub super_resolution_factor: f64,
}

impl Default for FastGaussianFitter {
    fn default() -> Self {
        Self {
            super_resolution_factor: 1.0,
        }
    }
}

impl FastGaussianFitter {
    /// Sets the super-resolution coordinate multiplier.
    #[must_use]
    pub fn with_super_resolution_factor(mut self, super_resolution_factor: f64) -> Self {
        self.super_resolution_factor = super_resolution_factor;
        self
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("tot is never NaN"));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

impl PeakFitter for FastGaussianFitter {
    fn fit(&self, hits: &[Hit]) -> NeutronEvent {
        if hits.len() < MIN_HITS {
            return NeutronEvent::FIT_FAILURE;
        }

        let s = self.super_resolution_factor;
        let x: Vec<f64> = hits.iter().map(|h| s * f64::from(h.x)).collect();
        let y: Vec<f64> = hits.iter().map(|h| s * f64::from(h.y)).collect();
        let tof: Vec<f64> = hits.iter().map(|h| f64::from(h.tof)).collect();
        let tot: Vec<f64> = hits.iter().map(|h| f64::from(h.tot)).collect();

        let median_tot = median(&tot);
        let centered_tot: Vec<f64> = tot.iter().map(|t| t - median_tot).collect();

        let mut x_f = Vec::new();
        let mut y_f = Vec::new();
        let mut tof_f = Vec::new();
        let mut tot_f = Vec::new();
        for i in 0..hits.len() {
            if centered_tot[i] > 0.0 {
                x_f.push(x[i]);
                y_f.push(y[i]);
                tof_f.push(tof[i]);
                tot_f.push(centered_tot[i]);
            }
        }

        if x_f.is_empty() {
            return NeutronEvent::FIT_FAILURE;
        }

        let n = x_f.len();
        let b = DVector::from_iterator(n, x_f.iter().zip(&y_f).map(|(xi, yi)| xi * xi + yi * yi));
        let a = DMatrix::from_fn(n, 4, |i, j| match j {
            0 => x_f[i],
            1 => y_f[i],
            2 => tot_f[i].ln(),
            _ => 1.0,
        });

        let Some(solution) = ColPivQR::new(a).solve(&b) else {
            return NeutronEvent::FIT_FAILURE;
        };

        let x_event = solution[0] / 2.0;
        let y_event = solution[1] / 2.0;
        let tof_event = tof_f.iter().sum::<f64>() / tof_f.len() as f64;
        let tot_event = tot_f.iter().sum::<f64>();

        NeutronEvent::new(x_event, y_event, tof_event, tot_event, hits.len() as u32)
    }
}
