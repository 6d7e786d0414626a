use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::{AppConfig, MAX_TIMELINE_DAYS};

/// Error type for reading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid config.toml: {key} must be between 1 and {max} (got {value})")]
    OutOfRange { key: &'static str, value: u32, max: u32 },
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Read `<data_dir>/config.toml`. A missing file yields the defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(source) => return Err(ConfigError::ReadError { path, source }),
    };
    let config: AppConfig = toml::from_str(&text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let timeline = [
        ("timeline.days", config.timeline.days),
        ("timeline.step_days", config.timeline.step_days),
    ];
    for (key, value) in timeline {
        if !(1..=MAX_TIMELINE_DAYS).contains(&value) {
            return Err(ConfigError::OutOfRange {
                key,
                value,
                max: MAX_TIMELINE_DAYS,
            });
        }
    }
    Ok(())
}
