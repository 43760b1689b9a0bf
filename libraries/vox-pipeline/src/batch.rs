//! Batch orchestration - scanning, measuring, and running the pipeline per file

use crate::error::Result;
use crate::executor::{PipelineOutput, StagePipeline};
use crate::scanner::AudioScanner;
use crate::{BatchReport, FileOutcome, JobStatus, PipelineSettings};
use futures_util::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use vox_core::{NoiseFilterMode, OutputExtension, ProcessingJob, ToolRunner};
use vox_loudness::{analyze, LoudnessMetrics};

/// Processes every supported file in a directory
///
/// A failure in one file is recorded in the report and never stops the
/// others.
pub struct BatchDriver {
    runner: Arc<dyn ToolRunner>,
    settings: PipelineSettings,
}

impl BatchDriver {
    pub fn new(runner: Arc<dyn ToolRunner>, settings: PipelineSettings) -> Self {
        Self { runner, settings }
    }

    /// Process all files directly inside `directory`
    ///
    /// # Errors
    /// Only batch-level problems are returned: invalid settings or a
    /// directory that cannot be listed. Per-file failures end up in the report.
    pub async fn run_batch(
        &self,
        directory: &Path,
        desired_volume: f64,
        output_extension: Option<OutputExtension>,
        noise_filter_mode: NoiseFilterMode,
    ) -> Result<BatchReport> {
        self.settings.validate()?;

        let start_time = Instant::now();
        let scanner = AudioScanner::new(&self.settings.extensions);
        let files = scanner.scan_directory(directory)?;

        tracing::info!(
            "Found {} audio files in {}",
            files.len(),
            directory.display()
        );

        let jobs = files.into_iter().map(|path| {
            ProcessingJob::new(path, desired_volume)
                .with_output_extension(output_extension.clone())
                .with_noise_filter(noise_filter_mode)
        });

        // `buffered` keeps outcomes in scan order
        let outcomes = stream::iter(jobs)
            .map(|job| {
                let span = tracing::info_span!("file", name = %job.display_name());
                self.process_job(job).instrument(span)
            })
            .buffered(self.settings.workers)
            .collect::<Vec<_>>()
            .await;

        let mut report = BatchReport::new(directory);
        report.outcomes = outcomes;
        report.duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(report)
    }

    /// Process a single job and turn the result into an outcome
    pub async fn process_job(&self, job: ProcessingJob) -> FileOutcome {
        let name = job.display_name();
        tracing::info!("Currently processing: {}", name);

        match self.try_process(&job).await {
            Ok((metrics, output)) => {
                tracing::info!(
                    "Successfully processed {} -> {}",
                    name,
                    output.final_path.display()
                );
                FileOutcome {
                    source_path: job.source_path,
                    status: JobStatus::Succeeded {
                        output_path: output.final_path,
                        max_volume: metrics.max_volume.unwrap_or_default(),
                        desired_volume: job.desired_volume,
                        adjustment_db: output.adjustment.db(),
                    },
                }
            }
            Err(e) => {
                let stage = e
                    .stage()
                    .map_or_else(|| "unknown".to_string(), |s| s.to_string());
                tracing::error!("Error processing {} ({} stage): {}", name, stage, e);
                FileOutcome::failed(job.source_path, &e)
            }
        }
    }

    async fn try_process(&self, job: &ProcessingJob) -> Result<(LoudnessMetrics, PipelineOutput)> {
        let metrics = analyze(self.runner.as_ref(), &job.source_path).await?;

        match metrics.max_volume {
            Some(max) => tracing::info!("Current max volume: {} dB", max),
            None => tracing::info!("Current max volume: unknown"),
        }
        tracing::info!("Desired volume: {} dB", job.desired_volume);

        let pipeline = StagePipeline::new(self.runner.as_ref(), &self.settings);
        let output = pipeline.run(job, &metrics).await?;
        Ok((metrics, output))
    }
}
