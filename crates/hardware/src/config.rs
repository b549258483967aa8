//! Configuration system for the SIC/XE emulator.
//!
//! This module defines the configuration structures used to parameterize the
//! emulator. It provides:
//! 1. **Defaults:** Baseline values for tracing, the step budget and device lookup.
//! 2. **Structures:** Hierarchical config for general, device and catalog settings.
//! 3. **Loading:** JSON deserialization where every field is optional.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or built with
//! `Config::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::{Result, SimError};

/// Default configuration constants for the emulator.
mod defaults {
    /// Directory that device files are resolved against.
    pub const DEVICE_DIRECTORY: &str = "./device";

    /// File extension of device backing files.
    pub const DEVICE_EXTENSION: &str = "device";
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use sicsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true, "max_steps": 10000 },
///     "devices": { "directory": "/tmp/devices" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.general.max_steps, Some(10000));
/// assert_eq!(config.devices.extension, "device");
/// assert!(config.catalog.path.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General execution settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Device file lookup
    #[serde(default)]
    pub devices: DeviceConfig,
    /// Instruction catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the document is not valid configuration JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Config`] if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// General execution settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit a trace event for every executed instruction
    #[serde(default)]
    pub trace_instructions: bool,

    /// Upper bound on instructions executed by a bounded run (`None` = unbounded)
    #[serde(default)]
    pub max_steps: Option<u64>,
}

/// Device lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Directory containing the device backing files
    #[serde(default = "DeviceConfig::default_directory")]
    pub directory: PathBuf,

    /// Extension of device backing files (without the dot)
    #[serde(default = "DeviceConfig::default_extension")]
    pub extension: String,
}

impl DeviceConfig {
    fn default_directory() -> PathBuf {
        PathBuf::from(defaults::DEVICE_DIRECTORY)
    }

    fn default_extension() -> String {
        defaults::DEVICE_EXTENSION.to_owned()
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            directory: Self::default_directory(),
            extension: Self::default_extension(),
        }
    }
}

/// Instruction catalog source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Definition file to load instead of the built-in catalog
    #[serde(default)]
    pub path: Option<PathBuf>,
}
