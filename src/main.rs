// convlog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading (explicit --config or platform default)
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the dedupe or analyze run and report rendering

use clap::{Parser, Subcommand};
use convlog::app;
use convlog::platform::config::{self, AppConfig, ConfigSource, PlatformPaths};
use convlog::util;
use std::path::PathBuf;
use std::process::ExitCode;

/// convlog - maintenance tools for AI conversation logs.
///
/// Without a subcommand, deduplicates the conversation log at its
/// configured location.
#[derive(Parser, Debug)]
#[command(name = "convlog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove repeated conversation entries, keeping the first occurrence.
    Dedupe {
        /// Conversation log to rewrite.
        path: Option<PathBuf>,

        /// Report what would be removed without writing anything.
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Emit the run summary as JSON.
        #[arg(long = "json")]
        json: bool,
    },

    /// Report token, size, and block metrics for AICF files.
    Analyze {
        /// Directory holding the AICF files.
        dir: Option<PathBuf>,

        /// Emit the report as JSON.
        #[arg(long = "json")]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config_path, required) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let loaded = config::load_config(&config_path, required);

    let config_level = loaded
        .as_ref()
        .ok()
        .and_then(|l| l.config.log_level.clone());
    util::logging::init(cli.debug, config_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "convlog starting"
    );
    tracing::debug!(path = %config_path.display(), required, "Config path resolved");

    let config = match loaded {
        Ok(loaded) => {
            match &loaded.source {
                ConfigSource::File(path) => {
                    tracing::info!(path = %path.display(), "Loaded config.toml");
                }
                ConfigSource::Defaults => {
                    tracing::debug!("No usable config.toml; using defaults");
                }
            }
            for warning in &loaded.warnings {
                tracing::warn!(warning = %warning, "Config warning");
            }
            loaded.config
        }
        Err(e) => return fail(&e.into()),
    };

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run(command: Option<Command>, config: &AppConfig) -> util::error::Result<()> {
    let stdout = std::io::stdout();

    match command.unwrap_or(Command::Dedupe {
        path: None,
        dry_run: false,
        json: false,
    }) {
        Command::Dedupe {
            path,
            dry_run,
            json,
        } => {
            let options = app::dedupe::DedupeOptions {
                log_path: path.unwrap_or_else(|| config.log_path.clone()),
                backup_suffix: config.backup_suffix.clone(),
                dry_run,
            };
            let run = app::dedupe::run_dedupe(&options)?;
            if json {
                app::report::write_dedupe_json(stdout.lock(), &run)?;
            } else {
                app::report::write_dedupe_report(stdout.lock(), &run)?;
            }
        }
        Command::Analyze { dir, json } => {
            let dir = dir.unwrap_or_else(|| config.aicf_dir.clone());
            let report = app::analyze::run_analysis(&dir, &config.aicf_files)?;
            if json {
                app::report::write_analysis_json(stdout.lock(), &report)?;
            } else {
                app::report::write_analysis_report(stdout.lock(), &report)?;
            }
        }
    }
    Ok(())
}

fn fail(err: &util::error::ConvlogError) -> ExitCode {
    tracing::error!(error = %err, "convlog failed");
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}
