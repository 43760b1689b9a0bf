//! Per-file processing job

use super::filter::{FilterGraph, BANDPASS_HIGHPASS_HZ, BANDPASS_LOWPASS_HZ};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Noise reduction applied by the noise stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoiseFilterMode {
    /// Signal passes through unchanged
    #[default]
    None,

    /// Pretrained recurrent-network noise suppression
    RnNoise,

    /// High-pass 200 Hz, low-pass 3000 Hz, then an adaptive FFT denoiser
    BandpassGate,
}

impl NoiseFilterMode {
    /// Map the numeric command-line selector (`1` or `2`) to a mode
    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            1 => Some(Self::RnNoise),
            2 => Some(Self::BandpassGate),
            _ => None,
        }
    }

    /// Filter graph for the noise stage
    ///
    /// `rnnoise_model` is only used by [`NoiseFilterMode::RnNoise`].
    pub fn filter_graph(self, rnnoise_model: &str) -> FilterGraph {
        match self {
            Self::None => FilterGraph::Passthrough,
            Self::RnNoise => FilterGraph::rnnoise(rnnoise_model),
            Self::BandpassGate => FilterGraph::cascade([
                FilterGraph::highpass(BANDPASS_HIGHPASS_HZ),
                FilterGraph::lowpass(BANDPASS_LOWPASS_HZ),
                FilterGraph::fft_denoise(),
            ]),
        }
    }
}

impl fmt::Display for NoiseFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "none",
            Self::RnNoise => "RNNoise",
            Self::BandpassGate => "bandpass + noise gate",
        };
        f.write_str(label)
    }
}

/// Requested output container extension, stored without the leading dot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputExtension(String);

impl OutputExtension {
    /// Normalize a user-supplied extension; the leading dot is optional
    ///
    /// Returns `None` for empty input or anything that would escape the file name.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if ext.is_empty() || ext.contains(['/', '\\', '.']) || ext.chars().any(char::is_whitespace)
        {
            return None;
        }
        Some(Self(ext.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OutputExtension {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid output extension: {:?}", value))
    }
}

impl From<OutputExtension> for String {
    fn from(ext: OutputExtension) -> Self {
        ext.0
    }
}

/// Everything needed to process one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingJob {
    pub source_path: PathBuf,

    /// Target max level in dB
    pub desired_volume: f64,

    /// Output extension; `None` keeps the source extension
    pub output_extension: Option<OutputExtension>,

    pub noise_filter_mode: NoiseFilterMode,
}

impl ProcessingJob {
    pub fn new(source_path: impl Into<PathBuf>, desired_volume: f64) -> Self {
        Self {
            source_path: source_path.into(),
            desired_volume,
            output_extension: None,
            noise_filter_mode: NoiseFilterMode::None,
        }
    }

    pub fn with_output_extension(mut self, ext: Option<OutputExtension>) -> Self {
        self.output_extension = ext;
        self
    }

    pub fn with_noise_filter(mut self, mode: NoiseFilterMode) -> Self {
        self.noise_filter_mode = mode;
        self
    }

    /// Extension of the source file without the dot, empty if it has none
    pub fn source_extension(&self) -> &str {
        self.source_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }

    /// Extension used for every artifact and the final file
    pub fn target_extension(&self) -> &str {
        self.output_extension
            .as_ref()
            .map_or_else(|| self.source_extension(), OutputExtension::as_str)
    }

    /// File name for log lines
    pub fn display_name(&self) -> String {
        display_name(&self.source_path)
    }
}

/// File name component of `path`, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_filter_selector() {
        assert_eq!(NoiseFilterMode::from_selector(1), Some(NoiseFilterMode::RnNoise));
        assert_eq!(
            NoiseFilterMode::from_selector(2),
            Some(NoiseFilterMode::BandpassGate)
        );
        assert_eq!(NoiseFilterMode::from_selector(0), None);
        assert_eq!(NoiseFilterMode::from_selector(3), None);
    }

    #[test]
    fn test_noise_filter_graphs() {
        assert!(NoiseFilterMode::None.filter_graph("cb.rnnn").is_passthrough());
        assert_eq!(
            NoiseFilterMode::RnNoise.filter_graph("cb.rnnn").to_string(),
            "arnndn=m=cb.rnnn"
        );
        assert_eq!(
            NoiseFilterMode::BandpassGate
                .filter_graph("cb.rnnn")
                .to_string(),
            "highpass=200,lowpass=3000,afftdn"
        );
    }

    #[test]
    fn test_output_extension_parse() {
        assert_eq!(OutputExtension::parse("mp3").unwrap().as_str(), "mp3");
        assert_eq!(OutputExtension::parse(".wav").unwrap().as_str(), "wav");
        assert_eq!(OutputExtension::parse(" flac ").unwrap().as_str(), "flac");
        assert!(OutputExtension::parse("").is_none());
        assert!(OutputExtension::parse(".").is_none());
        assert!(OutputExtension::parse("../mp3").is_none());
        assert!(OutputExtension::parse("tar.gz").is_none());
        assert!(OutputExtension::parse("m p3").is_none());
    }

    #[test]
    fn test_output_extension_serde() {
        let ext: OutputExtension = serde_json::from_str("\".mp3\"").unwrap();
        assert_eq!(ext.as_str(), "mp3");
        assert_eq!(serde_json::to_string(&ext).unwrap(), "\"mp3\"");
        assert!(serde_json::from_str::<OutputExtension>("\"\"").is_err());
    }

    #[test]
    fn test_target_extension() {
        let job = ProcessingJob::new("/audio/clip.wav", -1.0);
        assert_eq!(job.source_extension(), "wav");
        assert_eq!(job.target_extension(), "wav");

        let job = job.with_output_extension(OutputExtension::parse("mp3"));
        assert_eq!(job.target_extension(), "mp3");
        assert_eq!(job.display_name(), "clip.wav");
    }

    #[test]
    fn test_source_without_extension() {
        let job = ProcessingJob::new("/audio/clip", -1.0);
        assert_eq!(job.source_extension(), "");
        assert_eq!(job.target_extension(), "");
    }
}
