//! vox-adjust - batch max-volume normalization for a directory of recordings
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vox_cli::{report, Cli, VoxConfig};
use vox_pipeline::{BatchDriver, FfmpegRunner};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vox_cli=info,vox_pipeline=info,vox_loudness=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = VoxConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(&cli);
    config.validate()?;

    let runner = FfmpegRunner::new(config.tools.ffmpeg_path.clone()).with_timeout(config.timeout());
    let version = runner.check_available().await.with_context(|| {
        format!(
            "ffmpeg is required but could not be run from {}",
            runner.ffmpeg_path().display()
        )
    })?;
    tracing::debug!("Using {}", version);

    let driver = BatchDriver::new(Arc::new(runner), config.pipeline_settings());
    let batch = driver
        .run_batch(
            &cli.directory,
            cli.volume,
            cli.extension.clone(),
            cli.noise_filter_mode(),
        )
        .await?;

    for line in report::summary_lines(&batch) {
        println!("{}", line);
    }

    if let Some(path) = &cli.report {
        report::write_report(path, &batch)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(if batch.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
