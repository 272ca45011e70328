//! Seams to the external collaborators: the prediction service and the
//! reverse-geocoding provider.
//!
//! Futures are `?Send` so the same traits serve the browser's single-threaded
//! executor and native runtimes alike.

use async_trait::async_trait;
use common::{
    BatchPredictionResponse, FeatureList, HealthStatus, HouseFeatures, LatLng, ModelInfoResponse,
    PredictionResponse, TrainRequest, TrainResponse,
};

use crate::error::{GeocodeError, PredictionError, TrainingError};

/// Client of the remote prediction/training service.
///
/// Two error tiers: `predict`, `predict_batch`, `list_features` and
/// `train_model` report failures to the caller; `check_health` and
/// `get_model_info` absorb them into a synthesized "offline" answer.
#[async_trait(?Send)]
pub trait PredictionApi {
    /// `POST /predict`
    async fn predict(&self, request: &HouseFeatures) -> Result<PredictionResponse, PredictionError>;

    /// `GET /health`. Returns [`HealthStatus::offline`] on any failure.
    async fn check_health(&self) -> HealthStatus;

    /// `POST /train`
    async fn train_model(&self, request: &TrainRequest) -> Result<TrainResponse, TrainingError>;

    /// `GET /model/info`. Returns [`ModelInfoResponse::unavailable`] on any failure.
    async fn get_model_info(&self) -> ModelInfoResponse;

    /// `POST /predict/batch`
    async fn predict_batch(
        &self,
        houses: &[HouseFeatures],
    ) -> Result<BatchPredictionResponse, PredictionError>;

    /// `GET /features`
    async fn list_features(&self) -> Result<FeatureList, PredictionError>;
}

/// Resolves a map point to a display address.
#[async_trait(?Send)]
pub trait ReverseGeocoder {
    async fn reverse(&self, point: LatLng) -> Result<String, GeocodeError>;
}
