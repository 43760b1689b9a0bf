//! Command-line arguments
use clap::Parser;
use std::path::PathBuf;
use vox_core::{NoiseFilterMode, OutputExtension};

#[derive(Debug, Parser)]
#[command(name = "vox-adjust", version)]
#[command(
    about = "Normalize max volume, reduce noise and pad every .wav/.mp3 file in a directory",
    long_about = None
)]
pub struct Cli {
    /// Desired max volume in dB, e.g. -3
    #[arg(allow_negative_numbers = true, value_parser = parse_volume)]
    pub volume: f64,

    /// Directory containing the audio files
    #[arg(short, long, default_value = "outputs")]
    pub directory: PathBuf,

    /// Output extension, with or without the dot (e.g. mp3, .flac)
    #[arg(short, long, value_parser = parse_extension)]
    pub extension: Option<OutputExtension>,

    /// Noise reduction: 1 = RNNoise, 2 = bandpass + noise gate
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub noise_filter: Option<u8>,

    /// Configuration file (defaults to ./vox.toml when present)
    #[arg(short, long, env = "VOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of files processed at once
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Kill any ffmpeg invocation running longer than this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Write the batch report as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl Cli {
    pub fn noise_filter_mode(&self) -> NoiseFilterMode {
        self.noise_filter
            .and_then(NoiseFilterMode::from_selector)
            .unwrap_or_default()
    }
}

fn parse_volume(raw: &str) -> Result<f64, String> {
    let volume: f64 = raw.parse::<f64>().map_err(|e| e.to_string())?;
    if !volume.is_finite() {
        return Err(format!("volume must be a finite number of dB, got {}", raw));
    }
    Ok(volume)
}

fn parse_extension(raw: &str) -> Result<OutputExtension, String> {
    OutputExtension::parse(raw).ok_or_else(|| format!("invalid extension {:?}", raw))
}
