//! Stage pipeline executor
//!
//! ```text
//! Start ──gain──► GainApplied ──noise──► Filtered ──padding──► Padded ──finalize──► Done
//!   │                 │                     │
//!   └─────────────────┴─────────────────────┴──► Failed (artifacts deleted, source untouched)
//! ```
//!
//! Every stage is one blocking tool invocation that reads the previous
//! artifact and writes its own. A failed invocation is never retried.

use crate::artifact::{ArtifactHandle, ArtifactStage};
use crate::error::{PipelineError, Result, Stage, StageCause};
use crate::finalizer::finalize;
use crate::PipelineSettings;
use std::fmt;
use std::path::{Path, PathBuf};
use vox_core::{FilterGraph, NoiseFilterMode, ProcessingJob, ToolRunner};
use vox_loudness::{compute_adjustment, GainAdjustment, LoudnessMetrics};

/// Position of a job in the stage sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    GainApplied,
    Filtered,
    Padded,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of a completed pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Where the processed file ended up
    pub final_path: PathBuf,

    /// Gain that was applied
    pub adjustment: GainAdjustment,
}

/// Runs the gain, noise and padding stages for one job, then finalizes
pub struct StagePipeline<'a> {
    runner: &'a dyn ToolRunner,
    settings: &'a PipelineSettings,
}

impl<'a> StagePipeline<'a> {
    pub fn new(runner: &'a dyn ToolRunner, settings: &'a PipelineSettings) -> Self {
        Self { runner, settings }
    }

    /// Process `job` using its measured `metrics`
    ///
    /// On success the original file has been replaced (and possibly renamed).
    /// On any failure the original is untouched unless the replace already
    /// committed, and no artifact of this job is left on disk.
    pub async fn run(&self, job: &ProcessingJob, metrics: &LoudnessMetrics) -> Result<PipelineOutput> {
        let adjustment = compute_adjustment(metrics, job.desired_volume)?;
        let name = job.display_name();
        let ext = job.target_extension();
        let mut state = PipelineState::Start;

        tracing::info!("{}: real volume adjustment {}", name, adjustment);

        let volume_adjusted =
            ArtifactHandle::acquire(&job.source_path, ArtifactStage::VolumeAdjusted, ext);
        self.apply(
            Stage::Gain,
            &job.source_path,
            &FilterGraph::gain(adjustment.db()),
            &volume_adjusted,
        )
        .await?;
        state = advance(&name, state, PipelineState::GainApplied);

        if job.noise_filter_mode != NoiseFilterMode::None {
            tracing::info!("{}: applying noise reduction: {}", name, job.noise_filter_mode);
        }
        let noise_filtered =
            ArtifactHandle::acquire(&job.source_path, ArtifactStage::NoiseFiltered, ext);
        self.apply(
            Stage::Noise,
            volume_adjusted.path(),
            &job.noise_filter_mode.filter_graph(&self.settings.rnnoise_model),
            &noise_filtered,
        )
        .await?;
        state = advance(&name, state, PipelineState::Filtered);

        let padded = ArtifactHandle::acquire(&job.source_path, ArtifactStage::Padded, ext);
        self.apply(
            Stage::Padding,
            noise_filtered.path(),
            &FilterGraph::pad_whole_duration(self.settings.padding_seconds),
            &padded,
        )
        .await?;
        state = advance(&name, state, PipelineState::Padded);

        // Artifacts are released when the handles drop, whatever finalize returns
        let final_path = finalize(&job.source_path, padded.path(), job.source_extension(), ext)
            .await?;
        advance(&name, state, PipelineState::Done);

        Ok(PipelineOutput {
            final_path,
            adjustment,
        })
    }

    async fn apply(
        &self,
        stage: Stage,
        input: &Path,
        graph: &FilterGraph,
        output: &ArtifactHandle,
    ) -> Result<()> {
        let result = self
            .runner
            .transform(input, graph, output.path(), true)
            .await
            .map_err(|e| PipelineError::stage_failed(stage, e))?;

        if !result.success() {
            return Err(PipelineError::stage_failed(
                stage,
                StageCause::ToolFailed {
                    status: result.describe_status(),
                    detail: result
                        .last_diagnostic_line()
                        .unwrap_or("no diagnostic output")
                        .to_string(),
                },
            ));
        }

        Ok(())
    }
}

fn advance(name: &str, from: PipelineState, to: PipelineState) -> PipelineState {
    tracing::debug!("{}: {} -> {}", name, from, to);
    to
}
