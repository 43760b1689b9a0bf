//! Settings and result types for batch processing

use crate::error::{PipelineError, Result, Stage};
use crate::scanner::DEFAULT_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default RNNoise model file, resolved against the working directory
pub const DEFAULT_RNNOISE_MODEL: &str = "cb.rnnn";

/// Default amount of trailing silence, in seconds
pub const DEFAULT_PADDING_SECONDS: f64 = 0.1;

/// Tunables shared by every job in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Model file passed to the RNNoise filter
    pub rnnoise_model: String,

    /// Minimum output duration is input duration plus this
    pub padding_seconds: f64,

    /// Files processed concurrently (1 = sequential)
    pub workers: usize,

    /// Input extensions picked up by the scanner
    pub extensions: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            rnnoise_model: DEFAULT_RNNOISE_MODEL.to_string(),
            padding_seconds: DEFAULT_PADDING_SECONDS,
            workers: 1,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(PipelineError::Config(
                "workers must be at least 1".to_string(),
            ));
        }
        if !(self.padding_seconds.is_finite() && self.padding_seconds > 0.0) {
            return Err(PipelineError::Config(format!(
                "padding_seconds must be positive, got {}",
                self.padding_seconds
            )));
        }
        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err(PipelineError::Config(
                "at least one input extension is required".to_string(),
            ));
        }
        if self.rnnoise_model.trim().is_empty() {
            return Err(PipelineError::Config(
                "rnnoise_model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a single file ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded {
        output_path: PathBuf,
        max_volume: f64,
        desired_volume: f64,
        adjustment_db: f64,
    },
    Failed {
        /// `None` when the failure happened outside any stage
        stage: Option<Stage>,
        cause: String,
    },
}

/// Outcome of one file in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub source_path: PathBuf,

    #[serde(flatten)]
    pub status: JobStatus,
}

impl FileOutcome {
    pub fn failed(source_path: impl Into<PathBuf>, error: &PipelineError) -> Self {
        Self {
            source_path: source_path.into(),
            status: JobStatus::Failed {
                stage: error.stage(),
                cause: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, JobStatus::Succeeded { .. })
    }
}

/// Result of processing one directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub directory: PathBuf,

    /// One entry per scanned file, in scan order
    pub outcomes: Vec<FileOutcome>,

    pub duration_ms: u64,
}

impl BatchReport {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            outcomes: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Failed files with their stage and cause
    pub fn failures(&self) -> impl Iterator<Item = (&Path, Option<Stage>, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            JobStatus::Failed { stage, cause } => {
                Some((o.source_path.as_path(), *stage, cause.as_str()))
            }
            JobStatus::Succeeded { .. } => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary_text(&self) -> String {
        format!(
            "Processing complete: {} of {} files succeeded, {} failed ({:.1}s)",
            self.succeeded(),
            self.total(),
            self.failed(),
            self.duration_ms as f64 / 1000.0
        )
    }
}
