// convlog - app/analyze.rs
//
// One analysis run over the configured AICF files. Missing files are
// reported and skipped; an unreadable file aborts the run.

use crate::core::analyze::analyze_content;
use crate::core::model::{AnalysisTotals, FileMetrics};
use crate::platform::fs::read_file_lossy;
use crate::util::error::AnalyzeError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Per-file result, in the configured order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Analyzed(FileMetrics),
    Missing { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub directory: PathBuf,
    pub files: Vec<FileOutcome>,
    pub totals: AnalysisTotals,
}

pub fn run_analysis(directory: &Path, file_names: &[String]) -> Result<AnalysisReport, AnalyzeError> {
    let mut files = Vec::with_capacity(file_names.len());
    let mut totals = AnalysisTotals::default();

    for name in file_names {
        let path = directory.join(name);
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "AICF file not found");
            files.push(FileOutcome::Missing { path });
            continue;
        }

        let content = read_file_lossy(&path).map_err(|e| AnalyzeError::Read {
            path: path.clone(),
            source: e,
        })?;
        let metrics = analyze_content(&path, &content);
        tracing::debug!(
            path = %path.display(),
            tokens = metrics.tokens,
            size = metrics.size,
            blocks = metrics.semantic_blocks,
            "Analysed file"
        );
        totals.add(&metrics);
        files.push(FileOutcome::Analyzed(metrics));
    }

    tracing::info!(
        analysed = totals.files,
        missing = file_names.len() - totals.files,
        "Analysis complete"
    );

    Ok(AnalysisReport {
        directory: directory.to_path_buf(),
        files,
        totals,
    })
}
