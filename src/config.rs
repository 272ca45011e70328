use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_HISTORY_PATH: &str = "house_predictions.json";
pub const DEFAULT_CONFIG_FILE: &str = "houseprice";
pub const ENV_PREFIX: &str = "HOUSEPRICE";

/// Settings for the terminal client.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub geocoder_url: String,
    pub history_path: PathBuf,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads configuration: built-in defaults, then the config file, then
/// `HOUSEPRICE_*` environment variables (`.env` is read first).
///
/// Without an explicit path the optional `houseprice.{toml,yaml,json}` in
/// the working directory is used; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => {
            debug!("Reading configuration from {}", path.display());
            File::from(path).required(true)
        }
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = Config::builder()
        .set_default("api_url", DEFAULT_API_URL)?
        .set_default("geocoder_url", DEFAULT_GEOCODER_URL)?
        .set_default("history_path", DEFAULT_HISTORY_PATH)?
        .set_default("request_timeout_secs", 30)?
        .set_default("log_level", "info")?
        .add_source(file)
        .add_source(Environment::with_prefix(ENV_PREFIX))
        .build()
        .context("Failed to load configuration")?;

    let config: AppConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;

    debug!("Configuration loaded: {:?}", config);
    Ok(config)
}
