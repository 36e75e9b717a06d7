// convlog - util/constants.rs
//
// Single source of truth for all named constants, patterns, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "convlog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "convlog";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Conversation log structure
// =============================================================================

/// Strict pattern for a conversation entry header:
/// `## Chat <hex id> - <YYYY-MM-DD> - <title>`.
///
/// Capture groups: 1 = id, 2 = date, 3 = title.
pub const ENTRY_HEADER_PATTERN: &str = r"^## Chat ([a-f0-9]+) - (\d{4}-\d{2}-\d{2}) - (.+)$";

/// Date format carried by entry headers (chrono syntax).
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Prefix of any level-2 markdown section. Only used to end a duplicate
/// skip span; it never starts one.
pub const SECTION_START_PREFIX: &str = "## ";

// =============================================================================
// Dedupe defaults
// =============================================================================

/// Conversation log location, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = ".ai/conversation-log.md";

/// Suffix appended to the log's file name to form the backup sibling.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";

/// Suffix for the scratch file the filtered log is staged in before it is
/// renamed over the original.
pub const STAGING_SUFFIX: &str = ".tmp";

// =============================================================================
// Analyzer defaults
// =============================================================================

/// Directory holding the AICF files, relative to the working directory.
pub const DEFAULT_AICF_DIR: &str = "./.aicf";

/// AICF files analysed by default, in report order.
pub const DEFAULT_AICF_FILES: &[&str] = &[
    "index.aicf",
    "conversations.aicf",
    "decisions.aicf",
    "work-state.aicf",
    "technical-context.aicf",
];

/// Word-token pattern. Counting matches is equivalent to splitting on
/// `[\s\W]+` and discarding empty pieces.
pub const TOKEN_PATTERN: &str = r"\w+";

/// Semantic block marker pattern (`@CONVERSATION`, `@STATE`, ...).
pub const SEMANTIC_BLOCK_PATTERN: &str = r"@[A-Z_]+";

/// Rough bytes of JSON needed per token when the same content is stored as
/// JSON instead of AICF.
pub const JSON_BYTES_PER_TOKEN: u64 = 15;

/// Saving (percent) above which the report calls the compression excellent.
pub const EXCELLENT_COMPRESSION_PERCENT: f64 = 90.0;

// =============================================================================
// Logging and config
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config specify one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
