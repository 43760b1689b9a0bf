//! Layered configuration: optional TOML file, then `VOX_*` environment, then CLI flags
use crate::cli::Cli;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vox_pipeline::{PipelineSettings, DEFAULT_EXTENSIONS, DEFAULT_PADDING_SECONDS, DEFAULT_RNNOISE_MODEL};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "vox.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VoxConfig {
    #[serde(default = "default_tools")]
    pub tools: ToolSettings,

    #[serde(default = "default_pipeline")]
    pub pipeline: PipelineSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolSettings {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    #[serde(default = "default_rnnoise_model")]
    pub rnnoise_model: String,

    /// Per-invocation limit; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineSection {
    #[serde(default = "default_padding_seconds")]
    pub padding_seconds: f64,

    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for VoxConfig {
    fn default() -> Self {
        Self {
            tools: default_tools(),
            pipeline: default_pipeline(),
        }
    }
}

impl VoxConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `vox.toml` is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`VoxConfig::load`], reading variables from `env` instead of the process
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // VOX_TOOLS__FFMPEG_PATH, VOX_PIPELINE__WORKERS, ...
        settings = settings.add_source(
            config::Environment::with_prefix("VOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("pipeline.extensions")
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Apply command-line overrides on top of file and environment values
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(workers) = cli.workers {
            self.pipeline.workers = workers;
        }
        if let Some(timeout) = cli.timeout {
            self.tools.timeout_secs = Some(timeout);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tools.ffmpeg_path.as_os_str().is_empty() {
            return Err(CliError::Config("tools.ffmpeg_path must not be empty".to_string()));
        }

        if self.tools.timeout_secs == Some(0) {
            return Err(CliError::Config(
                "tools.timeout_secs must be at least 1 (omit it to disable the timeout)"
                    .to_string(),
            ));
        }

        self.pipeline_settings().validate()?;
        Ok(())
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            rnnoise_model: self.tools.rnnoise_model.clone(),
            padding_seconds: self.pipeline.padding_seconds,
            workers: self.pipeline.workers,
            extensions: self.pipeline.extensions.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.tools.timeout_secs.map(Duration::from_secs)
    }
}

// Default values
fn default_tools() -> ToolSettings {
    ToolSettings {
        ffmpeg_path: default_ffmpeg_path(),
        rnnoise_model: default_rnnoise_model(),
        timeout_secs: None,
    }
}

fn default_pipeline() -> PipelineSection {
    PipelineSection {
        padding_seconds: default_padding_seconds(),
        workers: default_workers(),
        extensions: default_extensions(),
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_rnnoise_model() -> String {
    DEFAULT_RNNOISE_MODEL.to_string()
}

fn default_padding_seconds() -> f64 {
    DEFAULT_PADDING_SECONDS
}

fn default_workers() -> usize {
    1
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}
