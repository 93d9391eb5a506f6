use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::EngineConfig;
use crate::logging::LogConfig;
use crate::models::AthleteProfile;

/// Main application configuration
///
/// Missing sections and keys take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Analytics engine settings
    pub engine: EngineConfig,

    /// Athlete profile used when the command line does not override it
    pub athlete: AthleteProfile,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        ConfigMetadata {
            version: "1.0".to_string(),
            updated_at: Utc::now(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metadata: ConfigMetadata::default(),
            engine: EngineConfig::default(),
            athlete: AthleteProfile::default(),
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config
            .engine
            .validate()
            .with_context(|| format!("Invalid engine settings in {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".loadwise")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing file yields the defaults silently. An unreadable or invalid
    /// file also yields the defaults, and the load error is handed back so the
    /// caller can report it once logging is up.
    pub fn load_or_default(path: Option<&Path>) -> (Self, Option<anyhow::Error>) {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            return (Self::default(), None);
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }
}
