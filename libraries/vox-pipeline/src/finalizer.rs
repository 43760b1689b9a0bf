//! Replacing the original file with the processed artifact
//!
//! The replace is a single rename, so the original is either fully replaced or
//! untouched. An extension change is a second rename; a crash between the two
//! leaves processed content under the old name, which a rerun will process again.

use crate::error::FinalizeError;
use std::path::{Path, PathBuf};
use vox_core::types::display_name;

/// Move `final_artifact` over `source_path`, then rename to `output_ext` if it differs
///
/// Returns the path the processed file ends up at.
///
/// # Errors
/// - [`FinalizeError::Replace`] if the atomic replace fails; the original is untouched
/// - [`FinalizeError::DestinationExists`] if another file already holds the new name
/// - [`FinalizeError::Rename`] if the extension rename fails
pub async fn finalize(
    source_path: &Path,
    final_artifact: &Path,
    original_ext: &str,
    output_ext: &str,
) -> Result<PathBuf, FinalizeError> {
    tokio::fs::rename(final_artifact, source_path)
        .await
        .map_err(|source| FinalizeError::Replace {
            target: source_path.to_path_buf(),
            artifact: final_artifact.to_path_buf(),
            source,
        })?;

    if output_ext == original_ext {
        return Ok(source_path.to_path_buf());
    }

    let renamed = source_path.with_extension(output_ext);
    let rename_error = |source: std::io::Error| FinalizeError::Rename {
        from: source_path.to_path_buf(),
        to: renamed.clone(),
        source,
    };

    // On case-insensitive filesystems a case-only change names the source itself
    if tokio::fs::try_exists(&renamed).await.map_err(rename_error)?
        && !is_same_file(source_path, &renamed).await.map_err(rename_error)?
    {
        return Err(FinalizeError::DestinationExists(renamed.clone()));
    }

    tokio::fs::rename(source_path, &renamed)
        .await
        .map_err(rename_error)?;

    tracing::info!("Renamed to {}", display_name(&renamed));
    Ok(renamed)
}

#[cfg(unix)]
async fn is_same_file(a: &Path, b: &Path) -> std::io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let a = tokio::fs::metadata(a).await?;
    let b = tokio::fs::metadata(b).await?;
    Ok(a.dev() == b.dev() && a.ino() == b.ino())
}

#[cfg(not(unix))]
async fn is_same_file(a: &Path, b: &Path) -> std::io::Result<bool> {
    Ok(tokio::fs::canonicalize(a).await? == tokio::fs::canonicalize(b).await?)
}
