use std::path::Path;

use anyhow::{Context as _, Result, bail};
use clap::Args;
use common::{
    BatchPredictionRequest, BatchPredictionResponse, HouseFeatures, LatLng, PredictionRecord,
    format_price_compact, format_vnd,
};
use compute::api::PredictionApi;
use compute::controller::SessionState;
use compute::error::SubmitError;
use compute::form::{FormField, FormState};
use compute::location::{LocationPicker, lookup};
use serde::Deserialize;
use tracing::{debug, info, trace, warn};
use validator::Validate;

use super::Context;
use crate::output::{key_value_table, or_na};

/// House description as typed on the command line.
///
/// Values stay text until submission so they go through the same
/// coercion as the browser form.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// Floor area in square meters
    #[arg(long)]
    pub area: String,
    #[arg(long)]
    pub bedrooms: String,
    #[arg(long)]
    pub bathrooms: String,
    #[arg(long, default_value = "1")]
    pub floors: String,
    #[arg(long)]
    pub year_built: Option<String>,
    /// Location quality score from 0 to 10
    #[arg(long)]
    pub location_score: Option<String>,
    /// Address; resolved from --lat/--lon when omitted
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl PredictArgs {
    pub fn to_form(&self) -> FormState {
        let mut form = FormState::default()
            .with(FormField::Area, self.area.as_str())
            .with(FormField::Bedrooms, self.bedrooms.as_str())
            .with(FormField::Bathrooms, self.bathrooms.as_str())
            .with(FormField::Floors, self.floors.as_str());

        let optional = [
            (FormField::YearBuilt, &self.year_built),
            (FormField::LocationScore, &self.location_score),
            (FormField::Location, &self.location),
        ];
        for (field, value) in optional {
            if let Some(value) = value {
                form.set(field, value.as_str());
            }
        }
        form
    }

    fn point(&self) -> Option<LatLng> {
        Some(LatLng::new(self.lat?, self.lon?))
    }
}

pub async fn predict(ctx: &Context, args: PredictArgs) -> Result<()> {
    trace!("Entering predict command");
    let controller = ctx.controller()?;

    let mut session = SessionState::default();
    session.apply_all(controller.on_init().await);

    let mut form = args.to_form();
    if form.location.trim().is_empty() {
        if let Some(point) = args.point() {
            let geocoder = ctx.geocoder()?;
            let mut picker = LocationPicker::default();
            let ticket = picker.select(point);
            let (ticket, outcome) = lookup(&geocoder, ticket).await;
            match picker.settle(ticket, outcome) {
                Some(address) => {
                    debug!("Using resolved address '{}'", address);
                    form.set(FormField::Location, address);
                }
                None => warn!("No address found for {:?}, predicting without one", point),
            }
        }
    }

    let record = controller.submit(&form, &session.health).await?;
    info!("Prediction stored in {}", ctx.config.history_path.display());

    ctx.format.print(&record, render_record)
}

/// Either a bare array of houses or the request body itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchInput {
    Houses(Vec<HouseFeatures>),
    Request(BatchPredictionRequest),
}

pub fn read_batch_file(path: &Path) -> Result<Vec<HouseFeatures>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let houses = match serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a list of houses", path.display()))?
    {
        BatchInput::Houses(houses) => houses,
        BatchInput::Request(request) => request.houses,
    };

    for (i, house) in houses.iter().enumerate() {
        house
            .validate()
            .with_context(|| format!("House #{} is invalid", i + 1))?;
    }
    Ok(houses)
}

pub async fn batch(ctx: &Context, file: &Path) -> Result<()> {
    trace!("Entering batch command");
    let houses = read_batch_file(file)?;
    if houses.is_empty() {
        bail!("{} contains no houses", file.display());
    }
    debug!("Loaded {} houses from {}", houses.len(), file.display());

    let api = ctx.api()?;
    if !api.check_health().await.model_loaded {
        return Err(SubmitError::ModelNotReady.into());
    }

    let response = api.predict_batch(&houses).await?;
    info!("Received {} predictions", response.predictions.len());

    ctx.format.print(&response, render_batch)
}

pub fn render_record(record: &PredictionRecord) -> String {
    let features = &record.features_used;
    key_value_table(&[
        (
            "Predicted price",
            format!(
                "{} ({})",
                format_price_compact(record.predicted_price),
                format_vnd(record.predicted_price)
            ),
        ),
        ("Area (m²)", or_na(features.area)),
        ("Bedrooms", or_na(features.bedrooms)),
        ("Bathrooms", or_na(features.bathrooms)),
        ("Floors", or_na(features.floors)),
        ("Year built", or_na(features.year_built)),
        ("Location score", or_na(features.location_score)),
        (
            "Time",
            record.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
    ])
}

fn render_batch(response: &BatchPredictionResponse) -> String {
    response
        .predictions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "#{:<3} {:>8} m²  {} bd  {:>10}",
                i + 1,
                or_na(p.features.area),
                or_na(p.features.bedrooms),
                format_price_compact(p.predicted_price)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
