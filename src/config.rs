//! Bridge Configuration
//!
//! Loaded from TOML. Missing files and missing keys fall back to defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::notice::UnavailableNotice;

/// Default channel namespace for scan views
pub const DEFAULT_CHANNEL_PREFIX: &str = "net.touchcapture.qr.flutterqr";

/// Bridge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Namespace used when naming per-view channels
    pub channel_prefix: String,
    /// Notice shown when camera permission is denied
    pub unavailable_notice: UnavailableNotice,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_prefix: DEFAULT_CHANNEL_PREFIX.to_string(),
            unavailable_notice: UnavailableNotice::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Default config file location (`<config dir>/qrview-bridge/config.toml`)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qrview-bridge")
            .join("config.toml")
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!("✅ Loaded bridge config from {:?}", path);
        Ok(config)
    }

    /// Load from an explicit path if given, else from [`Self::default_path`]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load(&Self::default_path()),
        }
    }
}
