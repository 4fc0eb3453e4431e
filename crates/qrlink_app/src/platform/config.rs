use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qrlink_core::{ControllerSettings, DEFAULT_FILENAME};
use qrlink_engine::{EngineConfig, HexColor, RenderOptions};
use qrlink_logging::{qrlink_info, qrlink_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_WIDTH: u32 = 4096;
pub const MAX_MARGIN: u32 = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub debounce_ms: u64,
    pub filename: String,
    pub width: u32,
    pub margin: u32,
    pub dark: HexColor,
    pub light: HexColor,
    pub download_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            debounce_ms: 500,
            filename: DEFAULT_FILENAME.to_string(),
            width: render.width,
            margin: render.margin,
            dark: render.dark,
            light: render.light,
            download_dir: PathBuf::from("downloads"),
        }
    }
}

impl AppConfig {
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            filename: self.filename.clone(),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            render: RenderOptions {
                width: self.width,
                margin: self.margin,
                dark: self.dark,
                light: self.light,
            },
            download_dir: self.download_dir.clone(),
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.width == 0 || self.width > MAX_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "width {} must be between 1 and {MAX_WIDTH}",
                self.width
            )));
        }
        if self.margin > MAX_MARGIN {
            return Err(ConfigError::Invalid(format!(
                "margin {} must be at most {MAX_MARGIN}",
                self.margin
            )));
        }
        if self.filename.is_empty() || self.filename.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "filename {:?} must be a bare file name",
                self.filename
            )));
        }
        Ok(self)
    }
}

pub fn parse_config(text: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = ron::from_str(text)?;
    config.validate()
}

/// Reads the config file, falling back to defaults when it is missing or bad.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            qrlink_info!("No config at {:?}; using defaults", path);
            return AppConfig::default();
        }
        Err(err) => {
            qrlink_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match parse_config(&content) {
        Ok(config) => {
            qrlink_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            qrlink_warn!("Ignoring config at {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
