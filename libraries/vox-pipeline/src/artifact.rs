//! Intermediate files owned by a running job
//!
//! For a source `X.ext` the stages write `X.ext.vol_adj.<out>`,
//! `X.ext.noise_filt.<out>` and `X.ext.tmp.<out>`. Names derive only from the
//! source path, so jobs for distinct sources never share an artifact.
//!
//! An [`ArtifactHandle`] deletes its file when dropped. Handles are acquired
//! before the stage that writes them runs, which also covers partial output
//! left by a failing tool.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Stage tag of an intermediate artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactStage {
    VolumeAdjusted,
    NoiseFiltered,
    Padded,
}

impl ArtifactStage {
    pub const ALL: [ArtifactStage; 3] = [
        ArtifactStage::VolumeAdjusted,
        ArtifactStage::NoiseFiltered,
        ArtifactStage::Padded,
    ];

    /// Marker inserted into the file name
    pub fn marker(self) -> &'static str {
        match self {
            ArtifactStage::VolumeAdjusted => "vol_adj",
            ArtifactStage::NoiseFiltered => "noise_filt",
            ArtifactStage::Padded => "tmp",
        }
    }

    /// Build the artifact path for `source` with output extension `ext`
    pub fn path_for(self, source: &Path, ext: &str) -> PathBuf {
        let mut name = OsString::from(source.as_os_str());
        name.push(".");
        name.push(self.marker());
        if !ext.is_empty() {
            name.push(".");
            name.push(ext);
        }
        PathBuf::from(name)
    }
}

impl fmt::Display for ArtifactStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ArtifactStage::VolumeAdjusted => "volume-adjusted",
            ArtifactStage::NoiseFiltered => "noise-filtered",
            ArtifactStage::Padded => "padded",
        };
        f.write_str(tag)
    }
}

/// Exclusive owner of one intermediate file
#[derive(Debug)]
pub struct ArtifactHandle {
    path: PathBuf,
    stage: ArtifactStage,
}

impl ArtifactHandle {
    /// Reserve the artifact path for `stage` of the job on `source`
    pub fn acquire(source: &Path, stage: ArtifactStage, ext: &str) -> Self {
        Self {
            path: stage.path_for(source, ext),
            stage,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stage(&self) -> ArtifactStage {
        self.stage
    }
}

impl Drop for ArtifactHandle {
    fn drop(&mut self) {
        remove_if_exists(&self.path, self.stage);
    }
}

fn remove_if_exists(path: &Path, stage: ArtifactStage) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!("Removed {} artifact {}", stage, path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "Failed to remove {} artifact {}: {}",
            stage,
            path.display(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_names() {
        let source = Path::new("/audio/clip.wav");
        assert_eq!(
            ArtifactStage::VolumeAdjusted.path_for(source, "wav"),
            PathBuf::from("/audio/clip.wav.vol_adj.wav")
        );
        assert_eq!(
            ArtifactStage::NoiseFiltered.path_for(source, "mp3"),
            PathBuf::from("/audio/clip.wav.noise_filt.mp3")
        );
        assert_eq!(
            ArtifactStage::Padded.path_for(source, "wav"),
            PathBuf::from("/audio/clip.wav.tmp.wav")
        );
        assert_eq!(
            ArtifactStage::Padded.path_for(Path::new("clip"), ""),
            PathBuf::from("clip.tmp")
        );
    }

    #[test]
    fn test_drop_removes_file() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("clip.wav");

        let handle = ArtifactHandle::acquire(&source, ArtifactStage::VolumeAdjusted, "wav");
        fs::write(handle.path(), b"partial").unwrap();
        let path = handle.path().to_path_buf();
        assert!(path.exists());

        drop(handle);
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_without_file_is_quiet() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("clip.wav");

        let handle = ArtifactHandle::acquire(&source, ArtifactStage::Padded, "wav");
        assert_eq!(handle.stage(), ArtifactStage::Padded);
        drop(handle);
        assert!(!ArtifactStage::Padded.path_for(&source, "wav").exists());
    }

    #[test]
    fn test_stage_tags() {
        let tags: Vec<String> = ArtifactStage::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(tags, ["volume-adjusted", "noise-filtered", "padded"]);
    }
}
