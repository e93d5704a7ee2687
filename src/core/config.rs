//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::capability::DEFAULT_MOBILE_MARKERS;
use crate::core::retrieval::DEFAULT_FIELD_NAME;
use crate::core::surface::ElementIds;
use crate::utils::network::DEFAULT_USER_AGENT;
use crate::utils::validation::endpoint_url;

/// Main application configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: EndpointConfig,
    pub page: ElementIds,
    pub timing: TimingConfig,
    pub capability: CapabilityConfig,
    pub save: SaveConfig,
    pub log_level: Option<String>, // "error", "warn", "info", "debug", "trace"
}

/// Retrieval endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub path: String,
    pub field_name: String,
    pub user_agent: String,
}

/// Delays used by the controller, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub notification_ttl_ms: u64,
    pub paste_delay_ms: u64,
    pub revoke_delay_ms: u64,
}

/// Client capability detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    pub mobile_markers: Vec<String>,
}

/// Local save configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub downloads_dir: Option<String>,
    pub filename_prefix: String,
    pub extension: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            path: "/download".to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            notification_ttl_ms: 5_000,
            paste_delay_ms: 100,
            revoke_delay_ms: 100,
        }
    }
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            mobile_markers: DEFAULT_MOBILE_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            downloads_dir: None,
            filename_prefix: "tiktok_video_".to_string(),
            extension: "mp4".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location. A missing file means
    /// defaults; nothing is written.
    pub fn load() -> Result<Self> {
        Self::load_at(&Self::get_config_path()?)
    }

    /// Load `config_path` if it exists, defaults otherwise
    pub fn load_at(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from(config_path)
        } else {
            tracing::debug!("No configuration at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: AppConfig =
            serde_json::from_str(&content).with_context(|| "Failed to parse config file")?;

        tracing::info!("Loaded configuration from: {:?}", path);
        Ok(config)
    }

    /// Load and validate, falling back to defaults on any problem
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };

        match loaded.and_then(|cfg| cfg.validate().map(|_| cfg)) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!("Unusable configuration ({:#}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = self.export()?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved configuration to: {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = Self::project_dirs()?;
        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Directory downloads land in when none is configured
    pub fn default_downloads_dir() -> Result<PathBuf> {
        if let Some(user_dirs) = directories::UserDirs::new() {
            if let Some(dir) = user_dirs.download_dir() {
                return Ok(dir.to_path_buf());
            }
        }
        Ok(Self::project_dirs()?.data_dir().join("downloads"))
    }

    pub fn downloads_dir(&self) -> Result<PathBuf> {
        match self.save.downloads_dir {
            Some(ref dir) => Ok(PathBuf::from(dir)),
            None => Self::default_downloads_dir(),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "tiktokdownloader", "client")
            .with_context(|| "Failed to get project directories")
    }

    /// Export configuration as JSON string
    pub fn export(&self) -> Result<String> {
        serde_json::to_string_pretty(self).with_context(|| "Failed to export configuration")
    }

    /// Parse and validate configuration from a JSON string
    pub fn import(json: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json).with_context(|| "Failed to parse imported configuration")?;

        config
            .validate()
            .with_context(|| "Imported configuration is invalid")?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        endpoint_url(&self.endpoint.base_url, &self.endpoint.path)
            .with_context(|| "Invalid retrieval endpoint")?;

        if self.endpoint.field_name.trim().is_empty() {
            anyhow::bail!("Form field name must not be empty");
        }

        let ids = &self.page;
        if ids.all().iter().any(|id| id.trim().is_empty()) {
            anyhow::bail!("Element ids must not be empty");
        }

        if self.timing.notification_ttl_ms == 0 || self.timing.notification_ttl_ms > 60_000 {
            anyhow::bail!("Notification lifetime should be between 1 and 60000 ms");
        }

        if self.timing.paste_delay_ms > 5_000 {
            anyhow::bail!("Paste delay should not exceed 5000 ms");
        }

        if self.timing.revoke_delay_ms > 60_000 {
            anyhow::bail!("Revoke delay should not exceed 60000 ms");
        }

        if self.capability.mobile_markers.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("Mobile markers must not be blank");
        }

        if self.save.extension.is_empty()
            || !self
                .save
                .extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
        {
            anyhow::bail!("Invalid file extension: {}", self.save.extension);
        }

        if self.save.filename_prefix.contains(['/', '\\']) {
            anyhow::bail!("Filename prefix must not contain path separators");
        }

        if let Some(ref log_level) = self.log_level {
            if !["error", "warn", "info", "debug", "trace"].contains(&log_level.as_str()) {
                anyhow::bail!(
                    "Invalid log level: must be 'error', 'warn', 'info', 'debug', or 'trace'"
                );
            }
        }

        Ok(())
    }
}

/// Runtime view of the configuration handed to the controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub ids: ElementIds,
    pub form_action: String,
    pub field_name: String,
    pub notification_ttl: Duration,
    pub paste_delay: Duration,
    pub revoke_delay: Duration,
    pub filename_prefix: String,
    pub extension: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ControllerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            ids: config.page.clone(),
            form_action: config.endpoint.path.clone(),
            field_name: config.endpoint.field_name.clone(),
            notification_ttl: Duration::from_millis(config.timing.notification_ttl_ms),
            paste_delay: Duration::from_millis(config.timing.paste_delay_ms),
            revoke_delay: Duration::from_millis(config.timing.revoke_delay_ms),
            filename_prefix: config.save.filename_prefix.clone(),
            extension: config.save.extension.clone(),
        }
    }
}
