//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::http_server::{HttpServer, ServerConfig};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve {
            config,
            port,
            data_dir,
            in_memory,
        } => {
            let config = resolve_config(config.as_deref(), port, data_dir, in_memory)?;
            serve(config)
        }
    }
}

/// Write a default configuration file
///
/// Refuses to overwrite an existing file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::AlreadyInitialized(config_path.display().to_string()));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(&ServerConfig::default())?;
    fs::write(config_path, content)?;

    println!(
        "{}",
        json!({"initialized": true, "config": config_path.display().to_string()})
    );
    Ok(())
}

/// Build the effective configuration from an optional file and CLI flags
///
/// `--in-memory` replaces the storage and auth sections with the in-memory
/// preset; `--port` and `--data-dir` override their fields.
pub fn resolve_config(
    path: Option<&Path>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    in_memory: bool,
) -> CliResult<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };

    if in_memory {
        let preset = ServerConfig::in_memory();
        config.storage.backend = preset.storage.backend;
        config.auth = preset.auth;
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }

    config.validate()?;
    Ok(config)
}

/// Open the stores and serve the API until the process is stopped
pub fn serve(config: ServerConfig) -> CliResult<()> {
    init_logging();

    let server = HttpServer::with_config(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;
    Ok(())
}

/// JSON log lines filtered by `RUST_LOG`, `info` when unset
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
    {
        tracing::warn!(error = %e, "tracing init failed");
    }
}
