//! Application settings and paths.
//!
//! Manages the XDG-compliant location of `settings.json`.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portsweep", "portsweep")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Workers per pool when `--con` is not given.
    pub default_concurrency: usize,
    /// Connect timeout per probe, in milliseconds.
    pub default_timeout_ms: u64,
    /// Output format when `--output` is not given.
    pub default_output_format: OutputFormat,
    /// Largest subnet (in usable hosts) the CLI will accept.
    pub max_subnet_hosts: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_concurrency: 100,
            default_timeout_ms: 1000,
            default_output_format: OutputFormat::Plain,
            max_subnet_hosts: 65536,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}
