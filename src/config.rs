//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.wordstats.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".wordstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address both listeners bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port accepting text submissions.
    #[serde(default = "default_write_port")]
    pub write_port: u16,

    /// Port serving statistics.
    #[serde(default = "default_read_port")]
    pub read_port: u16,

    /// Maximum accepted submission size in bytes (0 = unlimited).
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Seconds in-flight requests may take to finish after Ctrl-C.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            write_port: default_write_port(),
            read_port: default_read_port(),
            max_body_bytes: default_max_body_bytes(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_write_port() -> u16 {
    5555
}

fn default_read_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_shutdown_timeout() -> u64 {
    10
}

impl ServerConfig {
    /// Address of the write listener.
    pub fn write_addr(&self) -> String {
        format!("{}:{}", self.host, self.write_port)
    }

    /// Address of the read listener.
    pub fn read_addr(&self) -> String {
        format!("{}:{}", self.host, self.read_port)
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.wordstats.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.write_port {
            self.server.write_port = port;
        }
        if let Some(port) = args.read_port {
            self.server.read_port = port;
        }
        if let Some(limit) = args.max_body_bytes {
            self.server.max_body_bytes = limit;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
        if args.quiet {
            self.general.verbose = false;
        }
    }

    /// Check settings that only make sense once file and CLI are merged.
    pub fn validate(&self) -> Result<()> {
        let server = &self.server;

        if server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if server.write_port == server.read_port && server.write_port != 0 {
            bail!(
                "Write and read listeners cannot share port {}",
                server.write_port
            );
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
