use anyhow::Result;
use common::{FeatureList, HealthStatus, ModelInfo, ModelInfoResponse};
use compute::api::PredictionApi;
use tracing::{info, trace, warn};

use super::Context;
use crate::output::{key_value_table, or_na};

/// Feature names listed before collapsing the rest into a count.
pub const FEATURE_PREVIEW: usize = 5;

pub async fn health(ctx: &Context) -> Result<()> {
    trace!("Entering health command");
    let status = ctx.api()?.check_health().await;
    if status.model_loaded {
        info!("Service is up and the model is loaded");
    } else {
        warn!("Model is not ready (status '{}')", status.status);
    }
    ctx.format.print(&status, render_health)
}

pub async fn model_info(ctx: &Context) -> Result<()> {
    trace!("Entering model-info command");
    let response = ctx.api()?.get_model_info().await;
    ctx.format.print(&response, render_model_info)
}

pub async fn features(ctx: &Context) -> Result<()> {
    trace!("Entering features command");
    let list = ctx.api()?.list_features().await?;
    ctx.format.print(&list, render_features)
}

pub fn render_health(status: &HealthStatus) -> String {
    let badge = if status.model_loaded {
        "Model Ready"
    } else {
        "Model Offline"
    };
    key_value_table(&[
        ("Status", status.status.clone()),
        ("Model", badge.to_string()),
        ("Model path", or_na(status.model_path.as_deref())),
    ])
}

pub fn render_model_info(response: &ModelInfoResponse) -> String {
    match response.loaded() {
        Some(info) => render_loaded_model(info),
        None => response
            .message
            .clone()
            .unwrap_or_else(|| "No model information available".to_string()),
    }
}

fn render_loaded_model(info: &ModelInfo) -> String {
    let metrics = info.metrics.clone().unwrap_or_default();
    let (shown, hidden) = info.feature_preview(FEATURE_PREVIEW);
    let mut features = shown.join(", ");
    if hidden > 0 {
        features.push_str(&format!(" +{} more", hidden));
    }

    key_value_table(&[
        ("Version", info.short_version().to_string()),
        ("Trained at", or_na(info.trained_at.as_deref())),
        ("Training samples", or_na(info.training_samples)),
        ("R²", or_na(metrics.r2_score.map(|v| format!("{:.4}", v)))),
        ("RMSE", or_na(metrics.rmse.map(|v| format!("{:.2}", v)))),
        ("MAE", or_na(metrics.mae.map(|v| format!("{:.2}", v)))),
        ("Features", format!("{} ({})", info.feature_count, features)),
    ])
}

fn render_features(list: &FeatureList) -> String {
    let names = list.features.clone().unwrap_or_default();
    if names.is_empty() {
        return "No features reported".to_string();
    }
    let mut lines = vec![format!("{} features:", list.count)];
    lines.extend(names.iter().map(|name| format!("  - {}", name)));
    lines.join("\n")
}
