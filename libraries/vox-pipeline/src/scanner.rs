//! Directory scanning for input audio files

use crate::artifact::ArtifactStage;
use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Input extensions processed by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["wav", "mp3"];

/// Scanner for audio files directly inside a directory
#[derive(Debug, Clone)]
pub struct AudioScanner {
    /// Lowercase extensions without the dot
    extensions: Vec<String>,
}

impl Default for AudioScanner {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl AudioScanner {
    /// Create a scanner accepting `extensions` (case-insensitive, dot optional)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim();
                ext.strip_prefix('.').unwrap_or(ext).to_lowercase()
            })
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// List supported audio files in `path`, not descending into subdirectories
    ///
    /// Results are sorted by file name so runs are reproducible. Leftover
    /// artifacts from an interrupted run are skipped.
    pub fn scan_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Err(PipelineError::Scan {
                path: path.to_path_buf(),
                message: if path.exists() {
                    "not a directory".to_string()
                } else {
                    "directory not found".to_string()
                },
            });
        }

        let mut audio_files = Vec::new();
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| PipelineError::Scan {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            let file = entry.path();

            if !file.is_file() || !self.is_supported(file) {
                continue;
            }

            if self.is_intermediate(file) {
                tracing::warn!("Skipping leftover intermediate file {}", file.display());
                continue;
            }

            audio_files.push(file.to_path_buf());
        }

        Ok(audio_files)
    }

    /// Check if `path` has a supported extension
    pub fn is_supported(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Check if `path` is named like a pipeline artifact, e.g. `clip.wav.tmp.wav`
    pub fn is_intermediate(&self, path: &Path) -> bool {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };

        ArtifactStage::ALL.iter().any(|stage| {
            stem.strip_suffix(stage.marker())
                .and_then(|rest| rest.strip_suffix('.'))
                .is_some_and(|source| self.is_supported(Path::new(source)))
        })
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_supported() {
        let scanner = AudioScanner::default();
        assert!(scanner.is_supported(Path::new("take.wav")));
        assert!(scanner.is_supported(Path::new("take.WAV")));
        assert!(scanner.is_supported(Path::new("take.Mp3")));
        assert!(!scanner.is_supported(Path::new("take.flac")));
        assert!(!scanner.is_supported(Path::new("take")));
    }

    #[test]
    fn test_custom_extensions() {
        let scanner = AudioScanner::new([".FLAC", "ogg", " "]);
        assert_eq!(scanner.extensions(), ["flac", "ogg"]);
        assert!(scanner.is_supported(Path::new("take.flac")));
        assert!(!scanner.is_supported(Path::new("take.wav")));
    }

    #[test]
    fn test_is_intermediate() {
        let scanner = AudioScanner::default();
        assert!(scanner.is_intermediate(Path::new("clip.wav.vol_adj.wav")));
        assert!(scanner.is_intermediate(Path::new("clip.wav.noise_filt.mp3")));
        assert!(scanner.is_intermediate(Path::new("clip.MP3.tmp.mp3")));
        assert!(!scanner.is_intermediate(Path::new("clip.wav")));
        assert!(!scanner.is_intermediate(Path::new("my.tmp.wav")));
        assert!(!scanner.is_intermediate(Path::new("tmp.wav")));
    }

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        fs::write(base.join("b_take.wav"), b"fake wav").unwrap();
        fs::write(base.join("a_take.MP3"), b"fake mp3").unwrap();
        fs::write(base.join("notes.txt"), b"not audio").unwrap();
        fs::write(base.join("c_take.flac"), b"unsupported").unwrap();
        fs::write(base.join("b_take.wav.tmp.wav"), b"leftover").unwrap();

        // Not recursive
        let subdir = base.join("nested.wav");
        fs::create_dir(&subdir).unwrap();
        fs::write(subdir.join("deep.wav"), b"fake wav").unwrap();

        let scanner = AudioScanner::default();
        let files = scanner.scan_directory(base).unwrap();

        assert_eq!(files, vec![base.join("a_take.MP3"), base.join("b_take.wav")]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("outputs");

        let err = AudioScanner::default().scan_directory(&missing).unwrap_err();
        assert!(matches!(err, PipelineError::Scan { .. }));
        assert!(err.to_string().contains("directory not found"));
    }
}
