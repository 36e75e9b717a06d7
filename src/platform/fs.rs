// convlog - platform/fs.rs
//
// Filesystem helpers: whole-file reads, sibling path derivation, and
// durable writes for the backup-then-replace sequence.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Sibling of `path` whose file name is the original name plus `suffix`.
///
/// `notes/conversation-log.md` + `.backup` -> `notes/conversation-log.md.backup`.
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Create (or truncate) `path`, write `bytes`, and flush them to disk
/// before returning.
pub fn write_durable(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// The file a rewrite of `path` must replace: the link target when `path`
/// is a symlink, `path` itself otherwise.
///
/// Renaming a staged file over a symlink would swap the link for a regular
/// file and leave its target stale.
pub fn rewrite_target(path: &Path) -> io::Result<PathBuf> {
    if std::fs::symlink_metadata(path)?.file_type().is_symlink() {
        let target = std::fs::canonicalize(path)?;
        tracing::debug!(
            link = %path.display(),
            target = %target.display(),
            "Rewriting symlink target"
        );
        Ok(target)
    } else {
        Ok(path.to_path_buf())
    }
}

/// Replace the content of `path` with `bytes`.
///
/// The new content is written durably to `staging` first and then renamed
/// over `path`, so a reader sees either the old or the new file, never a
/// partial one. A leftover staging file from an interrupted run is
/// overwritten. The staging file is removed if the write fails.
///
/// `path` must be a regular file; resolve links with [`rewrite_target`].
pub fn replace_file(path: &Path, staging: &Path, bytes: &[u8]) -> io::Result<()> {
    if staging.is_file() {
        tracing::warn!(path = %staging.display(), "Overwriting stale staging file");
    }
    if let Err(e) = write_durable(staging, bytes) {
        if let Err(cleanup) = std::fs::remove_file(staging) {
            tracing::debug!(
                path = %staging.display(),
                error = %cleanup,
                "Could not remove staging file"
            );
        }
        return Err(e);
    }
    std::fs::rename(staging, path)
}
