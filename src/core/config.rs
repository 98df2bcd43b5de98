use std::path::Path;

use anyhow::{Context, Result};

use crate::core::settings::AppSettings;

pub static CONFIG_PATH: &str = "config.toml";

pub fn parse_settings(settings: &str) -> Result<AppSettings> {
    toml::from_str(settings).context("Unable to parse settings")
}

pub fn load_settings(config_path: &str) -> Result<AppSettings> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Unable to read config file {}", config_path))?;

    parse_settings(&content).with_context(|| format!("Invalid config file {}", config_path))
}

/// Loads settings from `config_path`, a missing file means default settings
pub fn load_settings_or_default(config_path: &str) -> Result<AppSettings> {
    if !Path::new(config_path).exists() {
        log::info!(
            "Config file {} not found, default settings are used",
            config_path
        );
        return Ok(AppSettings::default());
    }

    load_settings(config_path)
}
