// convlog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its path and
// underlying cause for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all convlog operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ConvlogError {
    /// Conversation log deduplication failed.
    Dedupe(DedupeError),

    /// AICF efficiency analysis failed.
    Analyze(AnalyzeError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Writing the report to its output stream failed.
    Report { source: io::Error },
}

impl fmt::Display for ConvlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dedupe(e) => write!(f, "Dedupe error: {e}"),
            Self::Analyze(e) => write!(f, "Analyze error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Report { source } => write!(f, "Failed to write report: {source}"),
        }
    }
}

impl std::error::Error for ConvlogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dedupe(e) => Some(e),
            Self::Analyze(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Report { source } => Some(source),
        }
    }
}

impl From<io::Error> for ConvlogError {
    fn from(source: io::Error) -> Self {
        Self::Report { source }
    }
}

// ---------------------------------------------------------------------------
// Dedupe errors
// ---------------------------------------------------------------------------

/// Errors related to loading, backing up, and rewriting the conversation log.
#[derive(Debug)]
pub enum DedupeError {
    /// The conversation log does not exist. Nothing was written.
    LogNotFound { path: PathBuf },

    /// The conversation log exists but could not be read.
    Read { path: PathBuf, source: io::Error },

    /// The conversation log is not valid UTF-8.
    InvalidEncoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    /// The backup would land on the staging file used for the rewrite.
    /// Nothing was written.
    BackupPathConflict { path: PathBuf, backup: PathBuf },

    /// Writing the backup failed. The original log is untouched.
    Backup {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },

    /// Replacing the original log failed after the backup was written.
    Overwrite {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for DedupeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogNotFound { path } => {
                write!(f, "Conversation log '{}' not found", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::InvalidEncoding { path, source } => {
                write!(f, "'{}': invalid UTF-8 encoding: {source}", path.display())
            }
            Self::BackupPathConflict { path, backup } => write!(
                f,
                "Backup '{}' collides with the staging file used to rewrite '{}'. Choose another backup suffix",
                backup.display(),
                path.display()
            ),
            Self::Backup {
                path,
                backup,
                source,
            } => write!(
                f,
                "Cannot write backup '{}': {source}. '{}' was left unchanged",
                backup.display(),
                path.display()
            ),
            Self::Overwrite {
                path,
                backup,
                source,
            } => write!(
                f,
                "Cannot rewrite '{}': {source}. The original content is preserved in '{}'",
                path.display(),
                backup.display()
            ),
        }
    }
}

impl std::error::Error for DedupeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::LogNotFound { .. } | Self::BackupPathConflict { .. } => None,
            Self::Read { source, .. } => Some(source),
            Self::InvalidEncoding { source, .. } => Some(source),
            Self::Backup { source, .. } => Some(source),
            Self::Overwrite { source, .. } => Some(source),
        }
    }
}

impl From<DedupeError> for ConvlogError {
    fn from(e: DedupeError) -> Self {
        Self::Dedupe(e)
    }
}

// ---------------------------------------------------------------------------
// Analyze errors
// ---------------------------------------------------------------------------

/// Errors related to AICF file analysis.
#[derive(Debug)]
pub enum AnalyzeError {
    /// An AICF file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for AnalyzeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
        }
    }
}

impl From<AnalyzeError> for ConvlogError {
    fn from(e: AnalyzeError) -> Self {
        Self::Analyze(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ConvlogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for convlog results.
pub type Result<T> = std::result::Result<T, ConvlogError>;
