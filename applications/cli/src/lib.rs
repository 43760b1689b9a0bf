//! Vox Post command-line front end
//!
//! Argument parsing, layered configuration and report output for the
//! `vox-adjust` binary. Exposed as a library for testing.

pub mod cli;
pub mod config;
pub mod error;
pub mod report;

pub use cli::Cli;
pub use config::{PipelineSection, ToolSettings, VoxConfig};
pub use error::{CliError, Result};
