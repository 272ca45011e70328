//! Common transport-layer types shared between the terminal and browser clients.
//! These structs mirror the prediction service's request/response payloads
//! so every client can (de)serialize them without duplicating shapes.

mod format;
mod geo;
mod model_info;
mod prediction;
mod training;

pub use format::{format_price_compact, format_vnd};
pub use geo::{DEFAULT_POSITION, LatLng, ReverseGeocodeResponse};
pub use model_info::{FeatureList, HealthStatus, ModelInfo, ModelInfoResponse, ModelMetrics};
pub use prediction::{
    BatchPrediction, BatchPredictionRequest, BatchPredictionResponse, FeaturesUsed,
    HouseFeatures, PredictionRecord, PredictionResponse,
};
pub use training::{MAX_SAMPLES, MIN_SAMPLES, TrainPerformance, TrainRequest, TrainResponse};

use serde_json::Value;

/// Extracts the human-readable message from an error body of the form
/// `{"detail": ...}`.
///
/// A string detail is returned as-is; any other JSON value (FastAPI returns a
/// list for validation failures) is returned as its JSON text. Bodies that are
/// not JSON, have no `detail`, or carry `null`/an empty string yield `None`.
pub fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
