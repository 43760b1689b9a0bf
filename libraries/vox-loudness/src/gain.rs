//! Gain correction toward a target max level
//!
//! Gain = Desired Max Level - Measured Max Level
//!
//! The result is applied as-is: no clamping, no rounding. A very quiet source
//! gets a large positive boost and a file already at the target gets 0 dB.

use crate::analyzer::LoudnessMetrics;
use crate::error::{LoudnessError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decibels to add to a signal (negative values attenuate)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GainAdjustment(f64);

impl GainAdjustment {
    pub fn from_db(db: f64) -> Self {
        Self(db)
    }

    pub fn db(self) -> f64 {
        self.0
    }
}

impl fmt::Display for GainAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dB", self.0)
    }
}

/// Compute the gain that moves the measured max level to `desired_volume`
///
/// # Errors
/// Returns [`LoudnessError::MissingMaxVolume`] when the metrics carry no max
/// level; the job must not go on to any processing stage in that case.
pub fn compute_adjustment(metrics: &LoudnessMetrics, desired_volume: f64) -> Result<GainAdjustment> {
    let max_volume = metrics.max_volume.ok_or(LoudnessError::MissingMaxVolume)?;
    Ok(GainAdjustment(desired_volume - max_volume))
}
