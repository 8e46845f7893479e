//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// wordstats - word and letter frequency service
///
/// Accepts text on the write port and reports the number of unique words,
/// the top 5 words and the top 5 letters on the read port.
///
/// Examples:
///   wordstats
///   wordstats --write-port 6000 --read-port 9000
///   wordstats --config ./wordstats.toml --verbose
///   wordstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Host address both listeners bind to
    ///
    /// Defaults to 0.0.0.0 (from config or built-in default).
    #[arg(long, value_name = "HOST", env = "WORDSTATS_HOST")]
    pub host: Option<String>,

    /// Port of the listener that accepts text submissions (POST /)
    #[arg(long, value_name = "PORT", env = "WORDSTATS_WRITE_PORT")]
    pub write_port: Option<u16>,

    /// Port of the listener that serves statistics (GET /stats)
    #[arg(long, value_name = "PORT", env = "WORDSTATS_READ_PORT")]
    pub read_port: Option<u16>,

    /// Maximum size of a single submission in bytes (0 = unlimited)
    #[arg(long, value_name = "BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wordstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .wordstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref host) = self.host {
            if host.trim().is_empty() {
                return Err("Host must not be empty".to_string());
            }
        }

        if let (Some(write), Some(read)) = (self.write_port, self.read_port) {
            if write == read && write != 0 {
                return Err(format!(
                    "Write and read ports must differ (both are {})",
                    write
                ));
            }
        }

        if let Some(ref path) = self.config {
            if !path.is_file() {
                return Err(format!("Config file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
