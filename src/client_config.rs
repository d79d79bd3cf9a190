//! Client configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::chess::SnapshotKind;

/// Where to authenticate, where to play, and how the server encodes state.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Login endpoint (HTTP POST).
    #[serde(default = "default_auth_url")]
    auth_url: String,

    /// Game server endpoint (WebSocket).
    #[serde(default = "default_game_url")]
    game_url: String,

    /// Wire representation of game snapshots.
    #[serde(default)]
    snapshot_format: SnapshotKind,

    /// How long an interrupted match may take to shut down, in milliseconds.
    #[serde(default = "default_interrupt_grace_ms")]
    interrupt_grace_ms: u64,

    /// Longest the WebSocket handshake may take, in milliseconds.
    #[serde(default = "default_handshake_timeout_ms")]
    handshake_timeout_ms: u64,

    /// File receiving the client's logs.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_auth_url() -> String {
    "http://localhost:7202/api/login".to_string()
}

fn default_game_url() -> String {
    "ws://localhost:7201/ws".to_string()
}

fn default_interrupt_grace_ms() -> u64 {
    1000
}

fn default_handshake_timeout_ms() -> u64 {
    45_000
}

fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_chess.log")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            game_url: default_game_url(),
            snapshot_format: SnapshotKind::default(),
            interrupt_grace_ms: default_interrupt_grace_ms(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            log_file: default_log_file(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(game_url = %config.game_url, format = %config.snapshot_format, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces fields with any values given on the command line.
    pub fn apply_overrides(
        &mut self,
        auth_url: Option<String>,
        game_url: Option<String>,
        snapshot_format: Option<SnapshotKind>,
    ) {
        if let Some(url) = auth_url {
            debug!(auth_url = %url, "Overriding auth URL");
            self.auth_url = url;
        }
        if let Some(url) = game_url {
            debug!(game_url = %url, "Overriding game URL");
            self.game_url = url;
        }
        if let Some(format) = snapshot_format {
            debug!(format = %format, "Overriding snapshot format");
            self.snapshot_format = format;
        }
    }

    /// Grace period granted to an interrupted match.
    pub fn interrupt_grace(&self) -> Duration {
        Duration::from_millis(self.interrupt_grace_ms)
    }

    /// Bound on the WebSocket handshake when joining a match.
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
