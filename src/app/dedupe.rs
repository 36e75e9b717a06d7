// convlog - app/dedupe.rs
//
// One dedupe run against a conversation log on disk.
//
// Ordering:
//   1. Missing log -> error, nothing written.
//   2. Read the whole log and run the pure dedupe pass.
//   3. Refuse a backup path that equals the staging path, then write a
//      verbatim, fsynced backup next to the log.
//   4. Only after (3) succeeds, replace the log via a staged rename. A
//      symlinked log keeps its link; the file it points to is rewritten.

use crate::core::dedupe::deduplicate;
use crate::core::model::{DedupeStats, HeaderDecision};
use crate::core::parser::{join_lines, normalize_line_endings, split_lines};
use crate::platform::fs::{replace_file, rewrite_target, sibling_with_suffix, write_durable};
use crate::util::constants;
use crate::util::error::DedupeError;
use std::path::PathBuf;

/// Inputs for a dedupe run.
#[derive(Debug, Clone)]
pub struct DedupeOptions {
    pub log_path: PathBuf,
    pub backup_suffix: String,
    /// Compute and report without writing anything.
    pub dry_run: bool,
}

/// What a dedupe run did.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DedupeRun {
    pub log_path: PathBuf,
    /// Where the original content was saved. `None` on a dry run.
    pub backup_path: Option<PathBuf>,
    pub stats: DedupeStats,
    pub decisions: Vec<HeaderDecision>,
}

pub fn run_dedupe(options: &DedupeOptions) -> Result<DedupeRun, DedupeError> {
    let path = &options.log_path;

    if !path.exists() {
        tracing::warn!(path = %path.display(), "Conversation log not found");
        return Err(DedupeError::LogNotFound { path: path.clone() });
    }

    tracing::info!(path = %path.display(), "Reading conversation log");
    let raw = std::fs::read(path).map_err(|e| DedupeError::Read {
        path: path.clone(),
        source: e,
    })?;
    let original = String::from_utf8(raw).map_err(|e| DedupeError::InvalidEncoding {
        path: path.clone(),
        source: e,
    })?;

    let normalized = normalize_line_endings(&original);
    let result = deduplicate(split_lines(&normalized));
    let filtered = join_lines(&result.lines);

    tracing::info!(
        kept = result.stats.kept,
        removed_lines = result.stats.removed,
        "Dedupe pass complete"
    );

    if options.dry_run {
        tracing::info!("Dry run; log left unchanged");
        return Ok(DedupeRun {
            log_path: path.clone(),
            backup_path: None,
            stats: result.stats,
            decisions: result.decisions,
        });
    }

    let target = rewrite_target(path).map_err(|e| DedupeError::Read {
        path: path.clone(),
        source: e,
    })?;
    let backup_path = sibling_with_suffix(path, &options.backup_suffix);
    let staging = sibling_with_suffix(&target, constants::STAGING_SUFFIX);
    if options.backup_suffix == constants::STAGING_SUFFIX || backup_path == staging {
        return Err(DedupeError::BackupPathConflict {
            path: path.clone(),
            backup: backup_path,
        });
    }

    write_durable(&backup_path, original.as_bytes()).map_err(|e| DedupeError::Backup {
        path: path.clone(),
        backup: backup_path.clone(),
        source: e,
    })?;
    tracing::info!(backup = %backup_path.display(), "Backup created");

    replace_file(&target, &staging, filtered.as_bytes()).map_err(|e| DedupeError::Overwrite {
        path: path.clone(),
        backup: backup_path.clone(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), lines = result.stats.total_out, "Log rewritten");

    Ok(DedupeRun {
        log_path: path.clone(),
        backup_path: Some(backup_path),
        stats: result.stats,
        decisions: result.decisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(path: PathBuf) -> DedupeOptions {
        DedupeOptions {
            log_path: path,
            backup_suffix: ".backup".to_string(),
            dry_run: false,
        }
    }

    #[test]
    fn test_missing_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation-log.md");

        let err = run_dedupe(&options(path.clone())).unwrap_err();

        assert!(matches!(err, DedupeError::LogNotFound { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_dry_run_leaves_log_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        let text = "## Chat aa - 2024-01-01 - A\n## Chat aa - 2024-01-01 - A\n";
        std::fs::write(&path, text).unwrap();

        let run = run_dedupe(&DedupeOptions {
            dry_run: true,
            ..options(path.clone())
        })
        .unwrap();

        assert_eq!(run.stats.removed, 1);
        assert!(run.backup_path.is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
        assert!(!dir.path().join("log.md.backup").exists());
    }

    #[test]
    fn test_crlf_log_is_normalised_but_backup_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        let text = "## Chat aa - 2024-01-01 - A\r\nbody\r\n## Chat aa - 2024-01-01 - A\r\ndup\r\n";
        std::fs::write(&path, text).unwrap();

        let run = run_dedupe(&options(path.clone())).unwrap();

        // The trailing empty line belongs to the duplicate's span.
        assert_eq!(run.stats.total_in, 5);
        assert_eq!(run.stats.total_out, 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "## Chat aa - 2024-01-01 - A\nbody"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("log.md.backup")).unwrap(),
            text
        );
    }

    #[test]
    fn test_staging_suffix_as_backup_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        let text = "## Chat aa - 2024-01-01 - A\n## Chat aa - 2024-01-01 - A\n";
        std::fs::write(&path, text).unwrap();

        let err = run_dedupe(&DedupeOptions {
            backup_suffix: constants::STAGING_SUFFIX.to_string(),
            ..options(path.clone())
        })
        .unwrap_err();

        assert!(matches!(err, DedupeError::BackupPathConflict { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
        assert!(!dir.path().join("log.md.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_log_keeps_its_link() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("shared-log.md");
        let link = dir.path().join("log.md");
        std::fs::write(&real, "## Chat aa - 2024-01-01 - A\n## Chat aa - 2024-01-01 - A\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        run_dedupe(&options(link.clone())).unwrap();

        let meta = std::fs::symlink_metadata(&link).unwrap();
        assert!(meta.file_type().is_symlink());
        assert_eq!(
            std::fs::read_to_string(&real).unwrap(),
            "## Chat aa - 2024-01-01 - A"
        );
        assert!(dir.path().join("log.md.backup").is_file());
    }

    #[test]
    fn test_invalid_utf8_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.md");
        std::fs::write(&path, [0xFF, 0xFE]).unwrap();

        let err = run_dedupe(&options(path.clone())).unwrap_err();

        assert!(matches!(err, DedupeError::InvalidEncoding { .. }));
        assert!(!dir.path().join("log.md.backup").exists());
    }
}
