//! ffmpeg-backed tool runner
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use vox_core::{FilterGraph, ToolError, ToolOutput, ToolRunner};

/// Runs level measurement and filter stages through the ffmpeg binary
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    ffmpeg_path: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegRunner {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            timeout: None,
        }
    }

    /// Kill any invocation that runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// Verify the binary runs and return its version banner
    pub async fn check_available(&self) -> vox_core::Result<String> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = cmd.output().await.map_err(|e| self.launch_error(e))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let banner = stdout.lines().next().unwrap_or_default().to_string();

        if !output.status.success() {
            return Err(ToolError::launch(
                self.program(),
                std::io::Error::other(format!("`-version` exited with {}", output.status)),
            ));
        }

        Ok(banner)
    }

    fn program(&self) -> String {
        self.ffmpeg_path.display().to_string()
    }

    fn launch_error(&self, source: std::io::Error) -> ToolError {
        ToolError::launch(self.program(), source)
    }

    /// Base command: quiet banner, no interactive input, diagnostics captured
    fn command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.arg("-hide_banner")
            .arg("-nostdin")
            .arg("-i")
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn execute(&self, mut cmd: Command) -> vox_core::Result<ToolOutput> {
        tracing::debug!("Running {:?}", cmd.as_std());

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| ToolError::TimedOut {
                    program: self.program(),
                    seconds: limit.as_secs(),
                })?,
            None => cmd.output().await,
        }
        .map_err(|e| self.launch_error(e))?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait]
impl ToolRunner for FfmpegRunner {
    async fn measure(&self, input: &Path) -> vox_core::Result<ToolOutput> {
        let mut cmd = self.command(input);
        // Decode through volumedetect and throw the audio away
        cmd.arg("-filter:a").arg("volumedetect").arg("-f").arg("null").arg("-");
        self.execute(cmd).await
    }

    async fn transform(
        &self,
        input: &Path,
        graph: &FilterGraph,
        output: &Path,
        overwrite: bool,
    ) -> vox_core::Result<ToolOutput> {
        let mut cmd = self.command(input);
        if let Some(filter) = graph.to_filter_arg() {
            cmd.arg("-filter:a").arg(filter);
        }
        cmd.arg(if overwrite { "-y" } else { "-n" }).arg(output);
        self.execute(cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_creation() {
        let runner = FfmpegRunner::new(PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(runner.ffmpeg_path(), Path::new("/usr/bin/ffmpeg"));
        assert_eq!(runner.timeout, None);

        let runner = runner.with_timeout(Some(Duration::from_secs(30)));
        assert_eq!(runner.timeout, Some(Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let runner = FfmpegRunner::new(PathBuf::from("/nonexistent/vox-test/ffmpeg"));
        let err = runner.measure(Path::new("clip.wav")).await.unwrap_err();
        assert!(matches!(err, ToolError::Launch { .. }));
        assert!(err.to_string().contains("/nonexistent/vox-test/ffmpeg"));

        assert!(runner.check_available().await.is_err());
    }
}
