//! Shared helpers for pipeline integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use vox_core::{FilterGraph, ToolOutput, ToolRunner};

/// One recorded `transform` call
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub input: PathBuf,
    pub filter: Option<String>,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
struct Failure {
    source_name: String,
    marker: &'static str,
    write_partial: bool,
}

/// In-memory stand-in for ffmpeg
///
/// `measure` returns a scripted report per file name. `transform` copies the
/// input to the output and appends `|<filter>` (or `|copy`), so the final file
/// records every stage that touched it.
#[derive(Default)]
pub struct FakeRunner {
    reports: HashMap<String, String>,
    default_report: Option<String>,
    failures: Vec<Failure>,
    measured: Mutex<Vec<PathBuf>>,
    invocations: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    /// Every file measures at `max_volume`
    pub fn with_max_volume(max_volume: f64) -> Self {
        Self {
            default_report: Some(volumedetect_report(max_volume)),
            ..Self::default()
        }
    }

    /// Override the measurement report for one file
    pub fn report_for(mut self, file_name: &str, stderr: &str) -> Self {
        self.reports.insert(file_name.to_string(), stderr.to_string());
        self
    }

    /// Make the stage writing `<source>.<marker>.*` exit with status 1
    pub fn fail_stage(mut self, source_name: &str, marker: &'static str, write_partial: bool) -> Self {
        self.failures.push(Failure {
            source_name: source_name.to_string(),
            marker,
            write_partial,
        });
        self
    }

    pub fn measured(&self) -> Vec<PathBuf> {
        self.measured.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn invocations_for(&self, source_name: &str) -> Vec<Invocation> {
        let prefix = format!("{}.", source_name);
        self.invocations()
            .into_iter()
            .filter(|inv| file_name(&inv.output).starts_with(&prefix))
            .collect()
    }

    fn failure_for(&self, output: &Path) -> Option<&Failure> {
        let name = file_name(output);
        self.failures.iter().find(|f| {
            name.starts_with(&format!("{}.{}", f.source_name, f.marker))
        })
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn measure(&self, input: &Path) -> vox_core::Result<ToolOutput> {
        self.measured.lock().unwrap().push(input.to_path_buf());

        let report = self
            .reports
            .get(&file_name(input))
            .or(self.default_report.as_ref())
            .cloned()
            .unwrap_or_default();
        Ok(ToolOutput::success_with(report))
    }

    async fn transform(
        &self,
        input: &Path,
        graph: &FilterGraph,
        output: &Path,
        _overwrite: bool,
    ) -> vox_core::Result<ToolOutput> {
        let filter = graph.to_filter_arg();
        self.invocations.lock().unwrap().push(Invocation {
            input: input.to_path_buf(),
            filter: filter.clone(),
            output: output.to_path_buf(),
        });

        if let Some(failure) = self.failure_for(output) {
            if failure.write_partial {
                std::fs::write(output, b"partial")?;
            }
            return Ok(ToolOutput::new(
                1,
                format!("{}: Invalid data found when processing input\n", file_name(input)),
            ));
        }

        let mut content = std::fs::read(input)?;
        content.extend_from_slice(b"|");
        content.extend_from_slice(filter.as_deref().unwrap_or("copy").as_bytes());
        std::fs::write(output, content)?;

        Ok(ToolOutput::success_with("size=N/A time=00:00:01.00\n"))
    }
}

pub fn volumedetect_report(max_volume: f64) -> String {
    format!(
        "[Parsed_volumedetect_0 @ 0x5600] n_samples: 44100\n\
         [Parsed_volumedetect_0 @ 0x5600] mean_volume: {:.1} dB\n\
         [Parsed_volumedetect_0 @ 0x5600] max_volume: {:.1} dB\n",
        max_volume - 10.0,
        max_volume
    )
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sorted file names in `dir`
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Write a mono 16-bit PCM WAV with a sine tone at `amplitude` (0.0..=1.0)
pub fn write_tone_wav(path: &Path, amplitude: f64, seconds: f64) -> std::io::Result<()> {
    let sample_rate: u32 = 44100;
    let bits_per_sample: u16 = 16;
    let num_channels: u16 = 1;
    let num_samples = (f64::from(sample_rate) * seconds) as u32;
    let data_size = num_samples * u32::from(bits_per_sample / 8) * u32::from(num_channels);

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    let byte_rate = sample_rate * u32::from(num_channels) * u32::from(bits_per_sample / 8);
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&(num_channels * (bits_per_sample / 8)).to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for n in 0..num_samples {
        let t = f64::from(n) / f64::from(sample_rate);
        let sample = (amplitude * (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 32767.0) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    std::fs::write(path, wav)
}
