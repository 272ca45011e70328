pub mod geocode;

use async_trait::async_trait;
use common::{
    BatchPredictionRequest, BatchPredictionResponse, FeatureList, HealthStatus, HouseFeatures,
    ModelInfoResponse, PredictionResponse, TrainRequest, TrainResponse,
};
use compute::api::PredictionApi;
use compute::error::{PredictionError, TrainingError};
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use crate::settings;

/// Why a call did not produce a decoded success body.
#[derive(Debug)]
enum CallFailure {
    Transport,
    /// Non-2xx response with its raw body
    Status(String),
    Decode,
}

impl CallFailure {
    fn into_prediction_error(self) -> PredictionError {
        match self {
            CallFailure::Status(body) => PredictionError::from_body(&body),
            _ => PredictionError::fallback(),
        }
    }

    fn into_training_error(self) -> TrainingError {
        match self {
            CallFailure::Status(body) => TrainingError::from_body(&body),
            _ => TrainingError::fallback(),
        }
    }
}

async fn send<T>(request: Result<Request, gloo_net::Error>, label: &str) -> Result<T, CallFailure>
where
    T: for<'de> Deserialize<'de>,
{
    log::debug!("{} - sending request", label);

    let request = request.map_err(|e| {
        let error_msg = format!("Failed to serialize request: {}", e);
        log::error!("{} - {}", label, error_msg);
        CallFailure::Transport
    })?;

    let response = request.send().await.map_err(|e| {
        let error_msg = format!("Request failed: {}", e);
        log::error!("{} - {}", label, error_msg);
        CallFailure::Transport
    })?;

    if !response.ok() {
        log::warn!("{} - Non-OK response: {}", label, response.status());
        let body = response.text().await.unwrap_or_default();
        log::debug!("{} - error body: {}", label, body);
        return Err(CallFailure::Status(body));
    }

    log::trace!("{} - Response received, parsing JSON", label);
    let parsed = response.json::<T>().await.map_err(|e| {
        let error_msg = format!("Failed to parse response: {}", e);
        log::error!("{} - {}", label, error_msg);
        CallFailure::Decode
    })?;

    log::info!("{} - Success", label);
    Ok(parsed)
}

fn get(url: &str) -> Result<Request, gloo_net::Error> {
    Request::get(url).build()
}

fn post<B: Serialize>(url: &str, body: &B) -> Result<Request, gloo_net::Error> {
    Request::post(url).json(body)
}

/// Prediction service client using the browser's fetch API.
///
/// The base URL is captured from the settings when the client is built.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserPredictionApi {
    base_url: String,
}

impl Default for BrowserPredictionApi {
    fn default() -> Self {
        Self::new(settings::get_settings().api_base_url())
    }
}

impl BrowserPredictionApi {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait(?Send)]
impl PredictionApi for BrowserPredictionApi {
    async fn predict(&self, request: &HouseFeatures) -> Result<PredictionResponse, PredictionError> {
        send(post(&self.url("/predict"), request), "POST /predict")
            .await
            .map_err(CallFailure::into_prediction_error)
    }

    async fn check_health(&self) -> HealthStatus {
        send(get(&self.url("/health")), "GET /health")
            .await
            .unwrap_or_else(|_| HealthStatus::offline())
    }

    async fn train_model(&self, request: &TrainRequest) -> Result<TrainResponse, TrainingError> {
        send(post(&self.url("/train"), request), "POST /train")
            .await
            .map_err(CallFailure::into_training_error)
    }

    async fn get_model_info(&self) -> ModelInfoResponse {
        send(get(&self.url("/model/info")), "GET /model/info")
            .await
            .unwrap_or_else(|_| ModelInfoResponse::unavailable())
    }

    async fn predict_batch(
        &self,
        houses: &[HouseFeatures],
    ) -> Result<BatchPredictionResponse, PredictionError> {
        let body = BatchPredictionRequest {
            houses: houses.to_vec(),
        };
        send(post(&self.url("/predict/batch"), &body), "POST /predict/batch")
            .await
            .map_err(CallFailure::into_prediction_error)
    }

    async fn list_features(&self) -> Result<FeatureList, PredictionError> {
        send(get(&self.url("/features")), "GET /features")
            .await
            .map_err(CallFailure::into_prediction_error)
    }
}
