//! Batch summary output
use crate::error::{CliError, Result};
use std::path::Path;
use vox_core::types::display_name;
use vox_pipeline::BatchReport;

/// Human-readable summary: one line per failed file, then the totals
pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .failures()
        .map(|(path, stage, cause)| match stage {
            Some(stage) => format!("FAILED {} ({} stage): {}", display_name(path), stage, cause),
            None => format!("FAILED {}: {}", display_name(path), cause),
        })
        .collect();
    lines.push(report.summary_text());
    lines
}

/// Write `report` as pretty-printed JSON
pub fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    let to_report_error = |source: std::io::Error| CliError::Report {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_vec_pretty(report).map_err(|e| to_report_error(e.into()))?;
    std::fs::write(path, json).map_err(to_report_error)
}
