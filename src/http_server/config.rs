//! Server Configuration
//!
//! Configuration for the HTTP listener, storage backend and auth gate.
//! Loaded from a JSON file; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{CorruptPolicy, DEFAULT_SEED};

/// Configuration loading/validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 54321)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Where collections are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per collection under `data_dir`
    #[default]
    Json,
    /// Process memory only
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding `<collection>.json` files (default: "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// First id issued in an empty collection (default: 1)
    #[serde(default = "default_id_seed")]
    pub id_seed: u64,

    /// Handling of unreadable collection files (default: warn)
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Require a session token to create classified ads (default: true)
    #[serde(default = "default_true")]
    pub protect_classified_create: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    54321
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(), // Vite dev server
        "http://localhost:3000".to_string(),
    ]
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_id_seed() -> u64 {
    DEFAULT_SEED
}

fn default_true() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            id_seed: default_id_seed(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            protect_classified_create: default_true(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ServerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: ServerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory configuration: nothing touches disk and classified
    /// creation is open
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..Default::default()
            },
            auth: AuthConfig {
                protect_classified_create: false,
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.id_seed == 0 {
            return Err(ConfigError::Invalid("storage.id_seed must be >= 1".to_string()));
        }

        if self.storage.backend == StorageBackend::Json
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.data_dir is required for the json backend".to_string(),
            ));
        }

        Ok(())
    }
}
