//! CLI-specific error types
//!
//! All CLI errors are fatal: they are printed and the process exits non-zero.

use std::io;

use thiserror::Error;

use crate::http_server::config::ConfigError;
use crate::store::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Config file already exists: {0}")]
    AlreadyInitialized(String),

    #[error("Failed to open stores: {0}")]
    Boot(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code for scripts
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "MARKETBOARD_CONFIG_ERROR",
            CliError::AlreadyInitialized(_) => "MARKETBOARD_ALREADY_INITIALIZED",
            CliError::Boot(_) => "MARKETBOARD_BOOT_FAILED",
            CliError::Io(_) | CliError::Json(_) => "MARKETBOARD_IO_ERROR",
        }
    }
}
