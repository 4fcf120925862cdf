//! TOML-based configuration for the server binary.
//!
//! The file is looked up at the path given on the command line, falling
//! back to `piperace.toml` in the working directory.  When the file is
//! absent every field takes its default, so the server runs out of the box.
//!
//! ```toml
//! [endpoint]
//! host = "."
//! name = "Test Pipe"
//!
//! [session]
//! words_file = "Words.txt"
//! pacing_min_ms = 250
//! pacing_max_ms = 2500
//! seed = 42
//!
//! [server]
//! log_level = "info"
//! ```
//!
//! Fields annotated with `#[serde(default = "...")]` take the named default
//! when absent from the file, so a partial configuration keeps working
//! across upgrades.

use std::path::{Path, PathBuf};

use piperace_core::{PipeEndpoint, DEFAULT_HOST, DEFAULT_PIPE_NAME};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name consulted when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "piperace.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The pacing bounds are inverted.
    #[error("pacing_min_ms ({min}) must not exceed pacing_max_ms ({max})")]
    InvalidPacing { min: u64, max: u64 },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Which named endpoint to listen on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    /// Host scope; `"."` is the local machine.
    #[serde(default = "default_host")]
    pub host: String,
    /// Channel name under `\\<host>\pipe\`.
    #[serde(default = "default_pipe_name")]
    pub name: String,
}

/// Per-session serving behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Word list file; the built-in list is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_file: Option<PathBuf>,
    /// Inclusive lower bound on the pause after each word, in milliseconds.
    #[serde(default = "default_pacing_min")]
    pub pacing_min_ms: u64,
    /// Exclusive upper bound on the pause after each word, in milliseconds.
    #[serde(default = "default_pacing_max")]
    pub pacing_max_ms: u64,
    /// Base seed for per-worker generators; OS entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// General server behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_pipe_name() -> String {
    DEFAULT_PIPE_NAME.to_string()
}
fn default_pacing_min() -> u64 {
    250
}
fn default_pacing_max() -> u64 {
    2500
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            session: SessionConfig::default(),
            server: ServerSection::default(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            name: default_pipe_name(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            words_file: None,
            pacing_min_ms: default_pacing_min(),
            pacing_max_ms: default_pacing_max(),
            seed: None,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// The endpoint this configuration names.
    pub fn pipe_endpoint(&self) -> PipeEndpoint {
        PipeEndpoint::on_host(&self.endpoint.host, &self.endpoint.name)
    }

    /// Rejects configurations no session could honour.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPacing`] when the pacing bounds are
    /// inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.pacing_min_ms > self.session.pacing_max_ms {
            return Err(ConfigError::InvalidPacing {
                min: self.session.pacing_min_ms,
                max: self.session.pacing_max_ms,
            });
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads and validates the configuration from `path`, returning defaults
/// when the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", [`ConfigError::Parse`] for malformed TOML, and the validation
/// errors of [`ServerConfig::validate`].
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let config: ServerConfig = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
