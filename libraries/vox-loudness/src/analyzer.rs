//! Signal level measurement
//!
//! The measurement tool (ffmpeg's `volumedetect`) prints its results to the
//! diagnostic stream, one line per value:
//!
//! ```text
//! [Parsed_volumedetect_0 @ 0x5581] mean_volume: -27.1 dB
//! [Parsed_volumedetect_0 @ 0x5581] max_volume: -8.4 dB
//! ```
//!
//! Values that are missing from the report are left as `None`. Whether the
//! result is usable is decided by the caller.

use crate::error::{LoudnessError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use vox_core::ToolRunner;

static MAX_VOLUME: Lazy<Regex> = Lazy::new(|| level_pattern("max_volume"));
static MEAN_VOLUME: Lazy<Regex> = Lazy::new(|| level_pattern("mean_volume"));
static MAX_PEAK: Lazy<Regex> = Lazy::new(|| level_pattern("max_peak"));

fn level_pattern(name: &str) -> Regex {
    Regex::new(&format!(r"{}:\s*(-?\d+(?:\.\d+)?) dB", name)).expect("Invalid regex")
}

/// Decibel levels reported for one file
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoudnessMetrics {
    /// Peak sample magnitude in dBFS
    pub max_volume: Option<f64>,

    /// Average signal magnitude in dB
    pub mean_volume: Option<f64>,

    pub max_peak: Option<f64>,
}

impl LoudnessMetrics {
    /// True when the report contained none of the known values
    pub fn is_empty(&self) -> bool {
        self.max_volume.is_none() && self.mean_volume.is_none() && self.max_peak.is_none()
    }
}

impl fmt::Display for LoudnessMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |value: Option<f64>| {
            value.map_or_else(|| "n/a".to_string(), |db| format!("{} dB", db))
        };
        write!(
            f,
            "max: {}, mean: {}, peak: {}",
            show(self.max_volume),
            show(self.mean_volume),
            show(self.max_peak)
        )
    }
}

/// Parse a `volumedetect` report
///
/// The first match of each value wins. Non-numeric values such as `-inf dB`
/// (reported for digital silence) are treated as absent.
pub fn parse_volume_report(report: &str) -> LoudnessMetrics {
    let find = |pattern: &Regex| {
        pattern
            .captures(report)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    };

    LoudnessMetrics {
        max_volume: find(&MAX_VOLUME),
        mean_volume: find(&MEAN_VOLUME),
        max_peak: find(&MAX_PEAK),
    }
}

/// Measure the levels of the file at `path`
///
/// The tool's generated audio is discarded; nothing is written to disk.
///
/// # Errors
/// - [`LoudnessError::ToolUnavailable`] if the tool cannot be run
/// - [`LoudnessError::ToolFailed`] if it exits unsuccessfully without reporting any level
pub async fn analyze(runner: &dyn ToolRunner, path: &Path) -> Result<LoudnessMetrics> {
    let output = runner.measure(path).await?;
    let metrics = parse_volume_report(&output.stderr);

    if !output.success() {
        if metrics.is_empty() {
            return Err(LoudnessError::ToolFailed {
                status: output.describe_status(),
                detail: output
                    .last_diagnostic_line()
                    .unwrap_or("no diagnostic output")
                    .to_string(),
            });
        }
        tracing::warn!(
            "Measurement of {} exited with {} but reported levels; using them",
            path.display(),
            output.describe_status()
        );
    }

    tracing::debug!("Measured {}: {}", path.display(), metrics);
    Ok(metrics)
}
