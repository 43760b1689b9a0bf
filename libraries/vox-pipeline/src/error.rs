//! Error types for the pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use vox_core::ToolError;
use vox_loudness::LoudnessError;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Step of the per-file pipeline a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analysis,
    Gain,
    Noise,
    Padding,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Analysis => "analysis",
            Stage::Gain => "gain",
            Stage::Noise => "noise",
            Stage::Padding => "padding",
            Stage::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Why an external processing stage failed
#[derive(Debug, Error)]
pub enum StageCause {
    /// The tool ran and exited unsuccessfully
    #[error("{status}: {detail}")]
    ToolFailed { status: String, detail: String },

    /// The tool could not be run or timed out
    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Errors from replacing the original file
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("Failed to replace {} with {}: {source}", target.display(), artifact.display())]
    Replace {
        target: PathBuf,
        artifact: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renamed path is taken by another file, which is left alone
    #[error("Cannot rename to {}: file already exists", .0.display())]
    DestinationExists(PathBuf),
}

/// Per-file or batch-level pipeline error
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Analysis failed: {0}")]
    Analysis(#[from] LoudnessError),

    #[error("{stage} stage failed: {cause}")]
    Stage { stage: Stage, cause: StageCause },

    #[error("Finalize failed: {0}")]
    Finalize(#[from] FinalizeError),

    #[error("Failed to scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn stage_failed(stage: Stage, cause: impl Into<StageCause>) -> Self {
        Self::Stage {
            stage,
            cause: cause.into(),
        }
    }

    /// The pipeline step this error belongs to, `None` for batch-level errors
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Analysis(_) => Some(Stage::Analysis),
            Self::Stage { stage, .. } => Some(*stage),
            Self::Finalize(_) => Some(Stage::Finalize),
            Self::Scan { .. } | Self::Config(_) => None,
        }
    }
}
