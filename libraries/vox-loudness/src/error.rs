//! Error types for level measurement

use thiserror::Error;
use vox_core::ToolError;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur while measuring a file
#[derive(Error, Debug)]
pub enum LoudnessError {
    /// The measurement tool could not be run at all
    #[error("Measurement tool unavailable: {0}")]
    ToolUnavailable(#[from] ToolError),

    /// The tool exited unsuccessfully and reported no levels
    #[error("Measurement failed ({status}): {detail}")]
    ToolFailed { status: String, detail: String },

    /// The report has no max level, so no correction can be computed
    #[error("Measurement report has no max_volume")]
    MissingMaxVolume,
}
