use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::system::FileSystemInterface;

use super::types::Config;

pub const APP_DIR_NAME: &str = "SinkSwitch";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Resolve `<config_dir>/SinkSwitch/config.json`, creating the app directory.
///
/// Falls back to `config.json` in the working directory when there is no
/// per-user config directory or the app directory cannot be created.
pub fn resolve_config_path<F: FileSystemInterface>(
    file_system: &F,
    config_dir: Option<PathBuf>,
) -> PathBuf {
    let Some(config_dir) = config_dir else {
        warn!("No per-user config directory, using ./{}", CONFIG_FILE_NAME);
        return PathBuf::from(CONFIG_FILE_NAME);
    };

    let app_dir = config_dir.join(APP_DIR_NAME);
    if let Err(e) = file_system.create_config_dir(&app_dir) {
        warn!(
            "Could not create config directory {}: {}. Using ./{}",
            app_dir.display(),
            e,
            CONFIG_FILE_NAME
        );
        return PathBuf::from(CONFIG_FILE_NAME);
    }

    app_dir.join(CONFIG_FILE_NAME)
}

/// Configuration loader that uses dependency injection for file system operations
pub struct ConfigLoader<F: FileSystemInterface> {
    file_system: F,
    config_path: PathBuf,
}

impl<F: FileSystemInterface> ConfigLoader<F> {
    pub fn new(file_system: F, config_path: PathBuf) -> Self {
        Self {
            file_system,
            config_path,
        }
    }

    /// Create a loader for the per-user config location
    pub fn with_default_path(file_system: F) -> Self {
        let config_path = resolve_config_path(&file_system, dirs::config_dir());
        Self::new(file_system, config_path)
    }

    /// Load configuration, falling back to an empty one on any problem
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(Some(config)) => {
                debug!(
                    "Configuration loaded: {} allow-list entries",
                    config.devices.len()
                );
                config
            }
            Ok(None) => {
                debug!(
                    "No configuration file at {}, using empty configuration",
                    self.config_path.display()
                );
                Config::default()
            }
            Err(e) => {
                warn!("{}. Using empty configuration", e);
                Config::default()
            }
        }
    }

    /// Load configuration, reporting unreadable or malformed files
    pub fn try_load(&self) -> Result<Option<Config>> {
        debug!("Loading configuration from: {}", self.config_path.display());

        if !self.file_system.config_file_exists(&self.config_path) {
            return Ok(None);
        }

        let content = self
            .file_system
            .read_config_file(&self.config_path)
            .map_err(|source| Error::ConfigIo {
                path: self.config_path.clone(),
                source,
            })?;

        let config = serde_json::from_str(&content).map_err(|source| Error::ConfigFormat {
            path: self.config_path.clone(),
            source,
        })?;

        Ok(Some(config))
    }

    /// Save configuration, overwriting the whole file
    pub fn save(&self, config: &Config) -> Result<()> {
        debug!("Saving configuration to: {}", self.config_path.display());

        let content = to_pretty_json(config).map_err(|source| Error::ConfigFormat {
            path: self.config_path.clone(),
            source,
        })?;

        self.file_system
            .write_config_file(&self.config_path, &content)
            .map_err(|source| Error::ConfigIo {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Configuration saved to: {}", self.config_path.display());
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Check if the configuration file exists
    pub fn config_exists(&self) -> bool {
        self.file_system.config_file_exists(&self.config_path)
    }
}

// Four-space indent keeps the file easy to edit by hand
fn to_pretty_json(config: &Config) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    config.serialize(&mut serializer)?;
    buffer.push(b'\n');
    String::from_utf8(buffer).map_err(serde::ser::Error::custom)
}
