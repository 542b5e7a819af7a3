//! Pipeline configuration: the knobs in spec table form, with validation
//! deferred to [`PipelineConfig::build`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rustpix_algorithms::{AbsConfig, CentroidFitter, FastGaussianFitter};
use rustpix_core::PeakFitter;

use crate::{Error, Result};

/// Which peak fitter the pipeline should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PeakFitterKind {
    /// ToT-weighted (or unweighted) centroid.
    Centroid,
    /// Column-pivoted QR least-squares Gaussian fit.
    FastGaussian,
}

/// Full pipeline configuration, built with the same `with_*` convention as
/// [`AbsConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// ABS feather radius, min cluster size and time window.
    pub abs_radius: f64,
    /// Drop clusters below this size.
    pub abs_min_cluster_size: usize,
    /// ABS time window, in nanoseconds.
    pub abs_spider_time_range_ns: f64,
    /// Which peak fitter to run.
    pub peak_fitter: PeakFitterKind,
    /// Coordinate multiplier applied by the fitter.
    pub super_resolution: f64,
    /// Pulse rate, in Hz; `0.0` disables the bad-TOF diagnostic.
    pub pulse_rate_hz: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            abs_radius: 5.0,
            abs_min_cluster_size: 1,
            abs_spider_time_range_ns: 75.0,
            peak_fitter: PeakFitterKind::Centroid,
            super_resolution: 1.0,
            pulse_rate_hz: 0.0,
        }
    }
}

impl PipelineConfig {
    /// Sets the ABS feather radius.
    #[must_use]
    pub fn with_abs_radius(mut self, abs_radius: f64) -> Self {
        self.abs_radius = abs_radius;
        self
    }

    /// Sets the ABS minimum cluster size.
    #[must_use]
    pub fn with_abs_min_cluster_size(mut self, abs_min_cluster_size: usize) -> Self {
        self.abs_min_cluster_size = abs_min_cluster_size;
        self
    }

    /// Sets the ABS time window, in nanoseconds.
    #[must_use]
    pub fn with_abs_spider_time_range_ns(mut self, abs_spider_time_range_ns: f64) -> Self {
        self.abs_spider_time_range_ns = abs_spider_time_range_ns;
        self
    }

    /// Sets which peak fitter to use.
    #[must_use]
    pub fn with_peak_fitter(mut self, peak_fitter: PeakFitterKind) -> Self {
        self.peak_fitter = peak_fitter;
        self
    }

    /// Sets the super-resolution coordinate multiplier.
    #[must_use]
    pub fn with_super_resolution(mut self, super_resolution: f64) -> Self {
        self.super_resolution = super_resolution;
        self
    }

    /// Sets the pulse rate, in Hz.
    #[must_use]
    pub fn with_pulse_rate_hz(mut self, pulse_rate_hz: f64) -> Self {
        self.pulse_rate_hz = pulse_rate_hz;
        self
    }

    /// Parses a `peak_fitter` string (`"centroid"` or `"fast_gaussian"`)
    /// into this config, returning a [`Error::ConfigError`] for anything
    /// else.
    pub fn with_peak_fitter_str(mut self, peak_fitter: &str) -> Result<Self> {
        self.peak_fitter = match peak_fitter {
            "centroid" => PeakFitterKind::Centroid,
            "fast_gaussian" => PeakFitterKind::FastGaussian,
            other => {
                return Err(Error::ConfigError(format!(
                    "unknown peak_fitter {other:?}, expected \"centroid\" or \"fast_gaussian\""
                )))
            }
        };
        Ok(self)
    }

    /// Validates the configuration and builds the corresponding [`AbsConfig`]
    /// and boxed [`PeakFitter`].
    pub fn build(self) -> Result<(AbsConfig, Box<dyn PeakFitter + Send + Sync>)> {
        if self.abs_radius < 0.0 {
            return Err(Error::ConfigError("abs.radius must be >= 0".to_string()));
        }
        if self.abs_spider_time_range_ns < 0.0 {
            return Err(Error::ConfigError(
                "abs.spider_time_range must be >= 0".to_string(),
            ));
        }
        if self.super_resolution <= 0.0 {
            return Err(Error::ConfigError(
                "super_resolution must be > 0".to_string(),
            ));
        }

        let abs_config = AbsConfig::default()
            .with_radius(self.abs_radius)
            .with_spider_time_range_ns(self.abs_spider_time_range_ns);

        let fitter: Box<dyn PeakFitter + Send + Sync> = match self.peak_fitter {
            PeakFitterKind::Centroid => Box::new(
                CentroidFitter::default().with_super_resolution_factor(self.super_resolution),
            ),
            PeakFitterKind::FastGaussian => Box::new(
                FastGaussianFitter::default()
                    .with_super_resolution_factor(self.super_resolution),
            ),
        };

        Ok((abs_config, fitter))
    }
}
