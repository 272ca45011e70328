use anyhow::Result;
use common::{TrainRequest, TrainResponse};
use compute::controller::{SessionState, SessionUpdate};
use serde::Serialize;
use tracing::{debug, info, trace};

use super::Context;
use crate::output::{key_value_table, or_na};

/// Training outcome together with the model state refreshed after it.
#[derive(Debug, Serialize)]
pub struct TrainReport {
    pub result: TrainResponse,
    pub session: Option<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub model_loaded: bool,
    pub version: Option<String>,
}

impl TrainReport {
    fn new(result: TrainResponse, updates: Vec<SessionUpdate>) -> Self {
        let session = if updates.is_empty() {
            None
        } else {
            let mut state = SessionState::default();
            state.apply_all(updates);
            Some(SessionSummary {
                model_loaded: state.model_ready(),
                version: state.model_info.map(|i| i.short_version().to_string()),
            })
        };
        Self { result, session }
    }
}

pub fn train_request(samples: Option<u32>, data_path: Option<String>) -> TrainRequest {
    match samples {
        Some(n) => TrainRequest::sample_data(n),
        None => TrainRequest::real_data(data_path),
    }
}

pub async fn train(ctx: &Context, samples: Option<u32>, data_path: Option<String>) -> Result<()> {
    trace!("Entering train command");
    let request = train_request(samples, data_path);
    debug!("Train request: {:?}", request);

    let controller = ctx.controller()?;
    let (result, updates) = controller.train(&request).await?;
    info!("Training completed with status '{}'", result.status);

    let report = TrainReport::new(result, updates);
    ctx.format.print(&report, render_train_report)
}

fn render_train_report(report: &TrainReport) -> String {
    let result = &report.result;
    let metrics = result
        .performance
        .as_ref()
        .and_then(|p| p.metrics.clone())
        .unwrap_or_default();

    let mut rows = vec![
        ("Status", result.status.clone()),
        ("Message", result.message.clone()),
        ("Model path", or_na(result.model_path.as_deref())),
        ("R²", or_na(metrics.r2_score.map(|v| format!("{:.4}", v)))),
        ("RMSE", or_na(metrics.rmse.map(|v| format!("{:.2}", v)))),
    ];
    if let Some(session) = &report.session {
        let badge = if session.model_loaded {
            "Model Ready"
        } else {
            "Model Offline"
        };
        rows.push(("Model", badge.to_string()));
        rows.push(("Version", or_na(session.version.as_deref())));
    }
    key_value_table(&rows)
}
