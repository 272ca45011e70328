pub mod history;
pub mod locate;
pub mod predict;
pub mod status;
pub mod train;

pub use history::{dashboard, history};
pub use locate::locate;
pub use predict::{PredictArgs, batch, predict};
pub use status::{features, health, model_info};
pub use train::train;

use anyhow::Result;
use compute::controller::Controller;
use compute::history::PredictionLog;
use tracing::debug;

use crate::client::{HttpPredictionApi, NominatimGeocoder};
use crate::config::AppConfig;
use crate::output::OutputFormat;
use crate::storage::FileStorage;

pub type CliController = Controller<HttpPredictionApi, FileStorage>;

/// What every command needs: resolved configuration and the output format.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: AppConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: AppConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn api(&self) -> Result<HttpPredictionApi> {
        debug!("Using prediction service at {}", self.config.api_url);
        HttpPredictionApi::new(&self.config.api_url, self.config.request_timeout())
    }

    pub fn geocoder(&self) -> Result<NominatimGeocoder> {
        NominatimGeocoder::new(&self.config.geocoder_url, self.config.request_timeout())
    }

    pub fn log(&self) -> PredictionLog<FileStorage> {
        debug!("Using prediction history at {}", self.config.history_path.display());
        PredictionLog::new(FileStorage::new(&self.config.history_path))
    }

    pub fn controller(&self) -> Result<CliController> {
        Ok(Controller::new(self.api()?, self.log()))
    }
}
