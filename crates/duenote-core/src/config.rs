//! DueNote configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DueNoteError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DueNoteConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub notes: NotesConfig,
}

impl DueNoteConfig {
    /// Load config from the default path (~/.duenote/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DueNoteError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DueNoteError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Load from `path` when given, from the default path otherwise.
    /// A missing file at the default path is not an error.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the DueNote home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".duenote")
    }
}

/// Gateway (HTTP transport) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    /// Request bodies above this size are refused before parsing.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 { 5000 }
fn default_host() -> String { "127.0.0.1".into() }
fn default_max_body_bytes() -> usize { 1024 * 1024 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Default bound on the serialized note payload, in characters.
pub const DEFAULT_MAX_PAYLOAD_CHARS: usize = 1000;

/// Note validation limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Upper bound on the serialized payload length, in characters.
    #[serde(default = "default_max_payload_chars")]
    pub max_payload_chars: usize,
}

fn default_max_payload_chars() -> usize { DEFAULT_MAX_PAYLOAD_CHARS }

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            max_payload_chars: default_max_payload_chars(),
        }
    }
}
