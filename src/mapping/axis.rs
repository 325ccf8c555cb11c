//! # Axis Scaler
//!
//! Converts raw signed 16-bit axis samples into speed fractions.
//!
//! The formula used is: `output = gain * raw / 32767`
//!
//! - `gain = 1.0`: slow lane, full deflection is 1.0
//! - `gain = 16.0`: fast lane, full deflection is 16.0
//!
//! Values beyond [-1, 1] are intended for gains above 1.0. Which physical
//! axis feeds which lane is decided by the mapping table, not here.
//!
//! ## Usage
//!
//! ```
//! use dictapi_pad::mapping::axis::scale;
//!
//! assert_eq!(scale(32767, 1.0), 1.0);
//! assert_eq!(scale(32767, 16.0), 16.0);
//! assert_eq!(scale(0, 16.0), 0.0);
//! ```

/// Raw value that maps to a fraction of exactly 1.0 at unit gain.
pub const AXIS_FULL_SCALE: f64 = 32767.0;

/// Default gain (slow lane).
pub const DEFAULT_GAIN: f64 = 1.0;

/// Scales a raw axis sample by `gain`.
///
/// `-32768` maps slightly past `-gain`; this asymmetry is kept.
#[must_use]
pub fn scale(raw: i16, gain: f64) -> f64 {
    gain * (f64::from(raw) / AXIS_FULL_SCALE)
}

/// A scaled sample of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSample {
    pub axis_index: usize,
    pub raw_value: i16,
    pub normalized_fraction: f64,
}

/// Scaler bound to one speed lane gain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScaler {
    gain: f64,
}

impl Default for AxisScaler {
    fn default() -> Self {
        Self { gain: DEFAULT_GAIN }
    }
}

impl AxisScaler {
    /// Creates a scaler with the given gain.
    ///
    /// # Examples
    ///
    /// ```
    /// use dictapi_pad::mapping::axis::AxisScaler;
    ///
    /// let fast = AxisScaler::new(16.0);
    /// assert_eq!(fast.sample(4, 32767).normalized_fraction, 16.0);
    /// ```
    #[must_use]
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }

    #[must_use]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Scales `raw_value` read from axis `axis_index`.
    #[must_use]
    pub fn sample(&self, axis_index: usize, raw_value: i16) -> AxisSample {
        AxisSample {
            axis_index,
            raw_value,
            normalized_fraction: scale(raw_value, self.gain),
        }
    }
}
