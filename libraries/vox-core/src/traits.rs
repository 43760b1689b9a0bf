//! Core traits for Vox Post
use crate::error::Result;
use crate::types::FilterGraph;
use async_trait::async_trait;
use std::path::Path;

/// Captured result of one external tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,

    /// Diagnostic text written by the tool
    pub stderr: String,
}

impl ToolOutput {
    /// Output of a process that exited with `code`
    pub fn new(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            stderr: stderr.into(),
        }
    }

    /// Output of a process that exited cleanly
    pub fn success_with(stderr: impl Into<String>) -> Self {
        Self::new(0, stderr)
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last non-empty line of the diagnostic text, used as a short failure cause
    pub fn last_diagnostic_line(&self) -> Option<&str> {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }

    /// Human-readable description of the exit status
    pub fn describe_status(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// External audio tool capability
///
/// Implementers wrap the measurement and processing programs. The pipeline only
/// talks to this trait, so tests can substitute a runner with scripted output.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run the level measurement against `input` and return its diagnostic text
    ///
    /// # Errors
    /// Returns an error if the tool cannot be started or does not finish
    async fn measure(&self, input: &Path) -> Result<ToolOutput>;

    /// Apply `graph` to `input`, writing the result to `output`
    ///
    /// `overwrite` must be passed through to the tool explicitly; implementers
    /// never assume it.
    ///
    /// # Errors
    /// Returns an error if the tool cannot be started or does not finish
    async fn transform(
        &self,
        input: &Path,
        graph: &FilterGraph,
        output: &Path,
        overwrite: bool,
    ) -> Result<ToolOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_status() {
        assert!(ToolOutput::success_with("").success());
        assert!(!ToolOutput::new(1, "boom").success());
        assert!(!ToolOutput::default().success());
        assert_eq!(ToolOutput::default().describe_status(), "terminated by signal");
        assert_eq!(ToolOutput::new(234, "").describe_status(), "exit code 234");
    }

    #[test]
    fn test_last_diagnostic_line() {
        let output = ToolOutput::new(1, "line one\nsrc.wav: Permission denied\n\n  \n");
        assert_eq!(
            output.last_diagnostic_line(),
            Some("src.wav: Permission denied")
        );
        assert_eq!(ToolOutput::new(1, "\n").last_diagnostic_line(), None);
    }
}
