//! Application settings: defaults, optional `dashboard.toml`, then
//! `DASHBOARD__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub data: DataSettings,
    pub window: WindowSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("dashboard").required(false))
            .add_source(Environment::with_prefix("DASHBOARD").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("data.path", "data_covid_indonesia.csv")?
            .set_default("window.title", "Dashboard Data Covid-19 Indonesia")?
            .set_default("window.width", 1400.0)?
            .set_default("window.height", 800.0)
    }
}
