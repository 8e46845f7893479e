//! wordstats - word and letter frequency service
//!
//! Accepts text submissions on one port and reports running statistics
//! (unique word count, top words, top letters) as JSON on another.
//!
//! Exit codes:
//!   0 - Clean shutdown
//!   1 - Invalid arguments, bad configuration, or listener failure

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use wordstats::analysis::{Aggregator, SharedStore};
use wordstats::cli::Args;
use wordstats::config::{Config, DEFAULT_CONFIG_FILE};
use wordstats::server::{self, AppState, Endpoint};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the log level, so it is loaded first.
    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("wordstats v{}", env!("CARGO_PKG_VERSION"));
    info!("{}", source);
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run(config).await {
        error!("Server failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .wordstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration, merge CLI overrides and validate the result.
///
/// Also returns a description of where the settings came from, to be
/// logged once logging is up.
fn load_config(args: &Args) -> Result<(Config, String)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        (
            Config::load(config_path)?,
            format!("Loaded config from: {}", config_path.display()),
        )
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, format!("Loaded default config from {}", DEFAULT_CONFIG_FILE)),
            Ok(None) => (Config::default(), "No config file found, using defaults".to_string()),
            Err(e) => (
                Config::default(),
                format!("Failed to load config ({:#}), using defaults", e),
            ),
        }
    };

    config.merge_with_args(args);
    config.validate()?;

    Ok((config, source))
}

/// Bind both listeners around one shared aggregator and serve until Ctrl-C.
async fn run(config: Config) -> Result<()> {
    let store: SharedStore = Arc::new(Aggregator::new());
    let state = AppState::new(store, config.server.max_body_bytes);

    let write = Endpoint::bind(
        "write",
        &config.server.write_addr(),
        server::write_router(state.clone()),
    )
    .await?;
    let read = Endpoint::bind(
        "read",
        &config.server.read_addr(),
        server::read_router(state),
    )
    .await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!("Failed to listen for Ctrl-C, shutting down: {}", e),
        }
        let _ = shutdown_tx.send(true);
    });

    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
    server::serve_all(vec![write, read], shutdown_rx, grace).await?;

    Ok(())
}
