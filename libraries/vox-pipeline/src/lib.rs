//! Batch post-processing pipeline for Vox Post
//!
//! For every `.wav`/`.mp3` file directly inside a directory:
//!
//! 1. Measure the max level (`vox-loudness`)
//! 2. Apply the gain that moves it to the target level
//! 3. Optionally reduce noise (RNNoise, or bandpass + FFT denoiser)
//! 4. Pad with trailing silence
//! 5. Atomically replace the original, then optionally change its extension
//!
//! Intermediate files are owned by [`ArtifactHandle`]s and deleted when the
//! job ends, successfully or not. One failing file never stops the batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use vox_core::NoiseFilterMode;
//! use vox_pipeline::{BatchDriver, FfmpegRunner, PipelineSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = Arc::new(FfmpegRunner::new(PathBuf::from("ffmpeg")));
//! let driver = BatchDriver::new(runner, PipelineSettings::default());
//!
//! let report = driver
//!     .run_batch(Path::new("outputs"), -3.0, None, NoiseFilterMode::None)
//!     .await?;
//! println!("{}", report.summary_text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod artifact;
pub mod batch;
pub mod error;
pub mod executor;
pub mod ffmpeg;
pub mod finalizer;
pub mod scanner;
mod types;

pub use artifact::{ArtifactHandle, ArtifactStage};
pub use batch::BatchDriver;
pub use error::{FinalizeError, PipelineError, Result, Stage, StageCause};
pub use executor::{PipelineOutput, PipelineState, StagePipeline};
pub use ffmpeg::FfmpegRunner;
pub use finalizer::finalize;
pub use scanner::{AudioScanner, DEFAULT_EXTENSIONS};
pub use types::{
    BatchReport, FileOutcome, JobStatus, PipelineSettings, DEFAULT_PADDING_SECONDS,
    DEFAULT_RNNOISE_MODEL,
};
