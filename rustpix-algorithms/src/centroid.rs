//! Centroid peak fitter: ToT-weighted (or unweighted) mean position.

use rustpix_core::{Hit, NeutronEvent, PeakFitter};

/// Centroid peak fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentroidFitter {
    /// Whether the centroid is weighted by each hit's time-over-threshold.
    pub weighted_by_tot: bool,
    /// Coordinate multiplier applied to the fitted position.
    pub super_resolution_factor: f64,
}

impl Default for CentroidFitter {
    fn default() -> Self {
        Self {
            weighted_by_tot: true,
            super_resolution_factor: 1.0,
        }
    }
}

impl CentroidFitter {
    /// Sets whether the centroid is ToT-weighted.
    #[must_use]
    pub fn with_weighted_by_tot(mut self, weighted_by_tot: bool) -> Self {
        self.weighted_by_tot = weighted_by_tot;
        self
    }

    /// Sets the super-resolution coordinate multiplier.
    #[must_use]
    pub fn with_super_resolution_factor(mut self, super_resolution_factor: f64) -> Self {
        self.super_resolution_factor = super_resolution_factor;
        self
    }
}

impl PeakFitter for CentroidFitter {
    fn fit(&self, hits: &[Hit]) -> NeutronEvent {
        if hits.is_empty() {
            return NeutronEvent::new(0.0, 0.0, 0.0, 0.0, 0);
        }

        let n = hits.len() as f64;
        let s = self.super_resolution_factor;

        let (x, y) = if self.weighted_by_tot {
            let tot_sum: f64 = hits.iter().map(|h| f64::from(h.tot)).sum();
            let x_sum: f64 = hits.iter().map(|h| f64::from(h.x) * f64::from(h.tot)).sum();
            let y_sum: f64 = hits.iter().map(|h| f64::from(h.y) * f64::from(h.tot)).sum();
            // A cluster with tot_sum == 0.0 yields NaN here by design: NaN
            // fails `NeutronEvent::is_valid`'s `>= 0.0` checks, so such a
            // cluster is silently dropped rather than given a fabricated
            // unweighted position.
            (s * x_sum / tot_sum, s * y_sum / tot_sum)
        } else {
            let x_sum: f64 = hits.iter().map(|h| f64::from(h.x)).sum();
            let y_sum: f64 = hits.iter().map(|h| f64::from(h.y)).sum();
            (s * x_sum / n, s * y_sum / n)
        };

        let tof = hits.iter().map(|h| f64::from(h.tof)).sum::<f64>() / n;
        let tot = hits.iter().map(|h| f64::from(h.tot)).sum::<f64>();

        NeutronEvent::new(x, y, tof, tot, hits.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn scenario_hits() -> Vec<Hit> {
        vec![
            Hit::new(1750, 2038, 2445, 1428, 0, 3026, 0),
            Hit::new(3015, 2073, 3212, 718, 0, 428, 0),
            Hit::new(772, 3912, 3133, 2664, 0, 3334, 0),
        ]
    }

    #[test]
    fn s2_weighted_centroid() {
        let fitter = CentroidFitter::default();
        let event = fitter.fit(&scenario_hits());
        assert_relative_eq!(event.x, 1863.66, epsilon = 0.1);
        assert_relative_eq!(event.y, 2718.74, epsilon = 0.1);
        assert_relative_eq!(event.tof, 2262.67, epsilon = 0.1);
    }

    #[test]
    fn s3_unweighted_centroid() {
        let fitter = CentroidFitter::default().with_weighted_by_tot(false);
        let event = fitter.fit(&scenario_hits());
        assert_relative_eq!(event.x, 1845.67, epsilon = 0.1);
        assert_relative_eq!(event.y, 2674.33, epsilon = 0.1);
        assert_relative_eq!(event.tof, 2262.67, epsilon = 0.1);
    }

    #[test]
    fn singleton_is_idempotent() {
        let fitter = CentroidFitter::default().with_super_resolution_factor(2.0);
        let hit = Hit::new(10, 20, 100, 0, 0, 50, 0);
        let event = fitter.fit(&[hit]);
        assert_relative_eq!(event.x, 20.0);
        assert_relative_eq!(event.y, 40.0);
        assert_relative_eq!(event.tof, 50.0);
        assert_relative_eq!(event.tot, 100.0);
        assert_eq!(event.n_hits, 1);
    }

    #[test]
    fn zero_tot_cluster_is_invalid_not_unweighted() {
        let fitter = CentroidFitter::default();
        let hits = vec![Hit::new(10, 20, 0, 0, 0, 0, 0), Hit::new(12, 22, 0, 0, 0, 0, 0)];
        let event = fitter.fit(&hits);
        assert!(!event.is_valid());
    }
}
