// convlog - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for convlog configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/convlog/ or %APPDATA%\convlog\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    /// Runs before logging is initialised, so it logs nothing itself.
    pub fn resolve() -> Self {
        let config_dir = ProjectDirs::from("", "", constants::APP_ID)
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self { config_dir }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[dedupe]` section.
    pub dedupe: DedupeSection,
    /// `[analyze]` section.
    pub analyze: AnalyzeSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[dedupe]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DedupeSection {
    /// Conversation log to deduplicate.
    pub log_path: Option<String>,
    /// Appended to the log's file name to name the backup.
    pub backup_suffix: Option<String>,
}

/// `[analyze]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalyzeSection {
    /// Directory holding the AICF files.
    pub directory: Option<String>,
    /// File names analysed, in report order.
    pub files: Option<Vec<String>>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Dedupe --
    pub log_path: PathBuf,
    pub backup_suffix: String,

    // -- Analyze --
    pub aicf_dir: PathBuf,
    pub aicf_files: Vec<String>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(constants::DEFAULT_LOG_PATH),
            backup_suffix: constants::DEFAULT_BACKUP_SUFFIX.to_string(),
            aicf_dir: PathBuf::from(constants::DEFAULT_AICF_DIR),
            aicf_files: constants::DEFAULT_AICF_FILES
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
            log_level: None,
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Values were read from this file.
    File(PathBuf),
    /// No usable file; built-in defaults apply.
    Defaults,
}

/// Result of [`load_config`].
///
/// Loading happens before logging is initialised (the file may set the log
/// level), so everything worth logging is carried here for the caller.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Load and validate a config file.
///
/// When `required` is false (the platform default location) a missing or
/// unreadable file yields defaults plus a warning. When `required` is true
/// (an explicit `--config`) those conditions are errors.
pub fn load_config(config_path: &Path, required: bool) -> Result<LoadedConfig, ConfigError> {
    if !required && !config_path.exists() {
        return Ok(LoadedConfig {
            config: AppConfig::default(),
            warnings: Vec::new(),
            source: ConfigSource::Defaults,
        });
    }

    let loaded = std::fs::read_to_string(config_path)
        .map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })
        .and_then(|content| parse_config(&content, config_path));

    match loaded {
        Ok((config, warnings)) => Ok(LoadedConfig {
            config,
            warnings,
            source: ConfigSource::File(config_path.to_path_buf()),
        }),
        Err(e) if !required => Ok(LoadedConfig {
            config: AppConfig::default(),
            warnings: vec![format!("{e}. Using defaults.")],
            source: ConfigSource::Defaults,
        }),
        Err(e) => Err(e),
    }
}

/// Parse and validate config.toml content.
///
/// Syntax errors are returned; out-of-range values become warnings.
pub fn parse_config(
    content: &str,
    config_path: &Path,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();
    let mut reject = |field: &str, value: String, expected: &str| {
        let err = ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected: expected.to_string(),
        };
        warnings.push(format!("{err}. Using default."));
    };

    // -- Dedupe: log_path --
    if let Some(ref path) = raw.dedupe.log_path {
        if path.trim().is_empty() {
            reject("dedupe.log_path", path.clone(), "a non-empty file path");
        } else {
            config.log_path = PathBuf::from(path);
        }
    }

    // -- Dedupe: backup_suffix --
    if let Some(ref suffix) = raw.dedupe.backup_suffix {
        if is_valid_suffix(suffix) {
            config.backup_suffix = suffix.clone();
        } else {
            reject(
                "dedupe.backup_suffix",
                suffix.clone(),
                "a suffix starting with '.', containing no path separator, and not the staging suffix '.tmp'",
            );
        }
    }

    // -- Analyze: directory --
    if let Some(ref dir) = raw.analyze.directory {
        if dir.trim().is_empty() {
            reject("analyze.directory", dir.clone(), "a non-empty directory path");
        } else {
            config.aicf_dir = PathBuf::from(dir);
        }
    }

    // -- Analyze: files --
    if let Some(ref files) = raw.analyze.files {
        if files.is_empty() {
            reject("analyze.files", "[]".to_string(), "at least one file name");
        } else if let Some(bad) = files.iter().find(|f| !is_bare_file_name(f)) {
            reject(
                "analyze.files",
                bad.clone(),
                "bare file names without directories",
            );
        } else {
            config.aicf_files = files.clone();
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            reject(
                "logging.level",
                level.clone(),
                "one of error, warn, info, debug, trace",
            );
        }
    }

    Ok((config, warnings))
}

fn is_valid_suffix(suffix: &str) -> bool {
    suffix.len() > 1
        && suffix.starts_with('.')
        && !suffix.contains(['/', '\\'])
        && suffix != constants::STAGING_SUFFIX
}

fn is_bare_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
