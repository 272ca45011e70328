use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use common::{
    BatchPredictionRequest, BatchPredictionResponse, FeatureList, HealthStatus, HouseFeatures,
    LatLng, ModelInfoResponse, PredictionResponse, ReverseGeocodeResponse, TrainRequest,
    TrainResponse,
};
use compute::api::{PredictionApi, ReverseGeocoder};
use compute::error::{GeocodeError, PredictionError, TrainingError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

const USER_AGENT: &str = concat!("houseprice/", env!("CARGO_PKG_VERSION"));

/// Why a call did not produce a decoded success body.
#[derive(Debug, Error)]
enum CallFailure {
    /// No response: connection refused, DNS, timeout
    #[error("request failed: {0}")]
    Transport(String),
    /// Non-2xx response with its raw body
    #[error("HTTP error: {status}")]
    Status { status: u16, body: String },
    /// 2xx response whose body did not match the expected shape
    #[error("failed to parse response: {0}")]
    Decode(String),
}

impl CallFailure {
    fn body(&self) -> Option<&str> {
        match self {
            CallFailure::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Prediction service client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    http: Client,
    base_url: String,
}

impl HttpPredictionApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn call<T>(&self, request: RequestBuilder, label: &str) -> Result<T, CallFailure>
    where
        T: DeserializeOwned,
    {
        debug!("{} - sending request", label);

        let response = request.send().await.map_err(|e| {
            let failure = CallFailure::Transport(e.to_string());
            error!("{} - {}", label, failure);
            failure
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let failure = CallFailure::Status {
                status: status.as_u16(),
                body,
            };
            warn!("{} - {}", label, failure);
            return Err(failure);
        }

        trace!("{} - response received, parsing JSON", label);
        let parsed = response.json::<T>().await.map_err(|e| {
            let failure = CallFailure::Decode(e.to_string());
            error!("{} - {}", label, failure);
            failure
        })?;

        info!("{} - Success", label);
        Ok(parsed)
    }
}

fn prediction_error(failure: CallFailure) -> PredictionError {
    failure
        .body()
        .map(PredictionError::from_body)
        .unwrap_or_else(PredictionError::fallback)
}

fn training_error(failure: CallFailure) -> TrainingError {
    failure
        .body()
        .map(TrainingError::from_body)
        .unwrap_or_else(TrainingError::fallback)
}

#[async_trait(?Send)]
impl PredictionApi for HttpPredictionApi {
    async fn predict(&self, request: &HouseFeatures) -> Result<PredictionResponse, PredictionError> {
        let builder = self.http.post(self.url("/predict")).json(request);
        self.call(builder, "POST /predict")
            .await
            .map_err(prediction_error)
    }

    async fn check_health(&self) -> HealthStatus {
        let builder = self.http.get(self.url("/health"));
        self.call(builder, "GET /health")
            .await
            .unwrap_or_else(|_| HealthStatus::offline())
    }

    async fn train_model(&self, request: &TrainRequest) -> Result<TrainResponse, TrainingError> {
        let builder = self.http.post(self.url("/train")).json(request);
        self.call(builder, "POST /train").await.map_err(training_error)
    }

    async fn get_model_info(&self) -> ModelInfoResponse {
        let builder = self.http.get(self.url("/model/info"));
        self.call(builder, "GET /model/info")
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
        let builder = self.http.post(self.url("/predict/batch")).json(&body);
        self.call(builder, "POST /predict/batch")
            .await
            .map_err(prediction_error)
    }

    async fn list_features(&self) -> Result<FeatureList, PredictionError> {
        let builder = self.http.get(self.url("/features"));
        self.call(builder, "GET /features")
            .await
            .map_err(prediction_error)
    }
}

/// Reverse geocoding against a Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait(?Send)]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, point: LatLng) -> Result<String, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        debug!("Reverse geocoding {:?} via {}", point, url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", point.lat.to_string()),
                ("lon", point.lng.to_string()),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Request(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        body.display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(GeocodeError::NotFound)
    }
}
