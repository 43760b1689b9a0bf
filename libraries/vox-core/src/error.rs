//! Core error types for Vox Post
use thiserror::Error;

/// Result type alias using `ToolError`
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised while invoking an external audio tool
///
/// A tool that runs and exits non-zero is not an error at this level; that is
/// reported through [`crate::ToolOutput`] so callers can decide what it means.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool binary could not be started
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool did not finish within the configured timeout
    #[error("{program} timed out after {seconds}s")]
    TimedOut { program: String, seconds: u64 },

    /// I/O errors while talking to the child process
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Create a launch error
    pub fn launch(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }
}
