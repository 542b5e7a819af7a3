//! The `Hit` value type: one pixel firing recovered from a TPX3 stream.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ImageSample;

/// Coarse clock: 40 MHz, used for ToA / ToT / ToF / spidertime. 25 ns/tick.
pub const T40_NS: f64 = 25.0;

/// Fine clock: 640 MHz, used for fToA. 25/16 ns/tick.
pub const T640_NS: f64 = 25.0 / 16.0;

/// One pixel firing ("hit") recovered from the Timepix3 stream.
///
/// All fields are raw detector units; see the `*_ns` accessors for the
/// nanosecond-scaled forms. Hits are immutable once decoded and owned by
/// the batch that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    /// X coordinate in the 0..=516 quad frame.
    pub x: u16,
    /// Y coordinate in the 0..=516 quad frame.
    pub y: u16,
    /// Time-over-threshold, 10-bit, in 25 ns units.
    pub tot: u16,
    /// Coarse time-of-arrival, 14-bit.
    pub toa: u16,
    /// Fine time-of-arrival, 4-bit, in 25/16 ns units.
    pub ftoa: u8,
    /// Time-of-flight relative to the last TDC, wrapped to one pulse period.
    pub tof: u32,
    /// Absolute 48-bit spidertime, in 25 ns units.
    pub spidertime: u64,
}

impl Hit {
    /// Creates a new hit from already-decoded fields.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(x: u16, y: u16, tot: u16, toa: u16, ftoa: u8, tof: u32, spidertime: u64) -> Self {
        Self {
            x,
            y,
            tot,
            toa,
            ftoa,
            tof,
            spidertime,
        }
    }

    /// Time-over-threshold in nanoseconds.
    #[inline]
    #[must_use]
    pub fn tot_ns(&self) -> f64 {
        f64::from(self.tot) * T40_NS
    }

    /// Coarse time-of-arrival in nanoseconds.
    #[inline]
    #[must_use]
    pub fn toa_ns(&self) -> f64 {
        f64::from(self.toa) * T40_NS
    }

    /// Fine time-of-arrival in nanoseconds.
    #[inline]
    #[must_use]
    pub fn ftoa_ns(&self) -> f64 {
        f64::from(self.ftoa) * T640_NS
    }

    /// Time-of-flight in nanoseconds.
    #[inline]
    #[must_use]
    pub fn tof_ns(&self) -> f64 {
        f64::from(self.tof) * T40_NS
    }

    /// Time-of-flight in milliseconds (used for the bad-TOF diagnostic).
    #[inline]
    #[must_use]
    pub fn tof_ms(&self) -> f64 {
        self.tof_ns() / 1.0e6
    }

    /// Absolute spidertime in nanoseconds.
    #[inline]
    #[must_use]
    pub fn spidertime_ns(&self) -> f64 {
        self.spidertime as f64 * T40_NS
    }
}

impl ImageSample for Hit {
    #[inline]
    fn x_ns_f64(&self) -> f64 {
        f64::from(self.x)
    }

    #[inline]
    fn y_ns_f64(&self) -> f64 {
        f64::from(self.y)
    }

    #[inline]
    fn tof_ns_f64(&self) -> f64 {
        self.tof_ns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_conversions() {
        let hit = Hit::new(388, 56, 64, 6164, 3, 1, 8_411_156);
        assert!((hit.tof_ns() - 25.0).abs() < f64::EPSILON);
        assert!((hit.spidertime_ns() - 210_278_900.0).abs() < 1e-6);
    }

    #[test]
    fn image_sample_capability() {
        let hit = Hit::new(10, 20, 5, 0, 0, 4, 0);
        assert!((hit.x_ns_f64() - 10.0).abs() < f64::EPSILON);
        assert!((hit.y_ns_f64() - 20.0).abs() < f64::EPSILON);
        assert!((hit.tof_ns_f64() - 100.0).abs() < f64::EPSILON);
    }
}
