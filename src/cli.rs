use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use crate::config::AppConfig;
use crate::output::OutputFormat;
use commands::{
    Context, PredictArgs, batch, dashboard, features, health, history, locate, model_info,
    predict, train,
};

#[derive(Parser, Debug)]
#[command(name = "houseprice")]
#[command(about = "Terminal client for the house price prediction service")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    ///
    /// Defaults to an optional `houseprice.toml` in the working directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the prediction service, e.g. http://localhost:8000
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// File holding the local prediction history
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict the price of one house and add it to the history
    Predict(PredictArgs),
    /// Predict prices for every house in a JSON file
    ///
    /// The file holds either an array of houses or an object with a
    /// `houses` array. Batch results are not added to the history.
    Batch {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Show the service status
    Health,
    /// Show metadata and metrics of the loaded model
    ModelInfo,
    /// List the features the model was trained on
    Features,
    /// Train a new model
    ///
    /// Without --samples the service trains on its real dataset, optionally
    /// read from --data-path on the server.
    Train {
        /// Train on this many generated rows (1000 to 100000)
        #[arg(long, conflicts_with = "data_path")]
        samples: Option<u32>,

        /// CSV path on the server
        #[arg(long)]
        data_path: Option<String>,
    },
    /// Show the stored prediction history, oldest first
    History {
        /// Only show the most recent N predictions
        #[arg(short = 'n', long)]
        last: Option<usize>,
    },
    /// Summarize the stored prediction history
    Dashboard {
        /// Number of recent predictions the distributions cover
        #[arg(short, long, default_value_t = compute::aggregate::DEFAULT_CHART_WINDOW)]
        window: usize,
    },
    /// Resolve a coordinate to an address
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

impl Cli {
    /// Applies the command line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(history) = &self.history {
            config.history_path = history.clone();
        }
        config
    }

    pub async fn run(self, config: AppConfig) -> Result<()> {
        let ctx = Context::new(self.apply_overrides(config), self.format);
        match self.command {
            Commands::Predict(args) => predict(&ctx, args).await?,
            Commands::Batch { file } => batch(&ctx, &file).await?,
            Commands::Health => health(&ctx).await?,
            Commands::ModelInfo => model_info(&ctx).await?,
            Commands::Features => features(&ctx).await?,
            Commands::Train { samples, data_path } => train(&ctx, samples, data_path).await?,
            Commands::History { last } => history(&ctx, last)?,
            Commands::Dashboard { window } => dashboard(&ctx, window)?,
            Commands::Locate { lat, lon } => locate(&ctx, lat, lon).await?,
        }
        Ok(())
    }
}
