//! Test doubles and record builders shared by the unit tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use common::{
    BatchPrediction, BatchPredictionResponse, FeatureList, FeaturesUsed, HealthStatus,
    HouseFeatures, LatLng, ModelInfo, ModelInfoResponse, ModelMetrics, PredictionRecord,
    PredictionResponse, TrainPerformance, TrainRequest, TrainResponse,
};

use crate::api::{PredictionApi, ReverseGeocoder};
use crate::error::{GeocodeError, PredictionError, TrainingError};

pub fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn response_with(price: f64, area: Option<f64>, bedrooms: Option<u32>) -> PredictionResponse {
    PredictionResponse {
        predicted_price: price,
        features_used: FeaturesUsed {
            area,
            bedrooms,
            bathrooms: Some(1),
            floors: Some(1),
            year_built: None,
            location_score: None,
        },
    }
}

pub fn record_with(price: f64, area: Option<f64>, bedrooms: Option<u32>) -> PredictionRecord {
    PredictionRecord::from_response(response_with(price, area, bedrooms), ts(2024, 1, 1))
}

pub fn model_info_fixture(version: &str) -> ModelInfo {
    ModelInfo {
        version: Some(version.to_string()),
        trained_at: Some("2024-05-01T10:30:00".to_string()),
        training_samples: Some(40_000),
        feature_count: 3,
        features: vec!["area".into(), "bedrooms".into(), "bathrooms".into()],
        metrics: Some(ModelMetrics {
            rmse: Some(1200.0),
            mae: Some(800.0),
            r2_score: Some(0.9),
            mse: None,
        }),
        model_path: None,
    }
}

/// Scripted [`PredictionApi`] that records what it was asked.
pub struct MockApi {
    health: HealthStatus,
    model_info: ModelInfoResponse,
    prediction: Result<PredictionResponse, PredictionError>,
    training: Result<TrainResponse, TrainingError>,
    predict_calls: RefCell<Vec<HouseFeatures>>,
    health_calls: Cell<usize>,
    train_calls: Cell<usize>,
}

impl MockApi {
    /// A service that cannot be reached.
    pub fn offline() -> Self {
        Self {
            health: HealthStatus::offline(),
            model_info: ModelInfoResponse::unavailable(),
            prediction: Err(PredictionError::fallback()),
            training: Err(TrainingError::fallback()),
            predict_calls: RefCell::new(Vec::new()),
            health_calls: Cell::new(0),
            train_calls: Cell::new(0),
        }
    }

    /// A service with a loaded model answering every call successfully.
    pub fn ready() -> Self {
        Self {
            health: HealthStatus {
                status: "healthy".to_string(),
                model_loaded: true,
                model_path: Some("models/xgb.pkl".to_string()),
            },
            model_info: ModelInfoResponse::unavailable(),
            prediction: Ok(response_with(2.0e9, Some(100.0), Some(2))),
            training: Ok(TrainResponse {
                status: "success".to_string(),
                message: "Model trained".to_string(),
                model_path: Some("models/xgb.pkl".to_string()),
                performance: Some(TrainPerformance {
                    metrics: Some(ModelMetrics::default()),
                    feature_count: 3,
                    features: Some(vec!["area".into(), "bedrooms".into(), "bathrooms".into()]),
                }),
            }),
            ..Self::offline()
        }
    }

    pub fn with_model_info(mut self, info: ModelInfoResponse) -> Self {
        self.model_info = info;
        self
    }

    pub fn with_prediction(mut self, result: Result<PredictionResponse, PredictionError>) -> Self {
        self.prediction = result;
        self
    }

    pub fn with_training(mut self, result: Result<TrainResponse, TrainingError>) -> Self {
        self.training = result;
        self
    }

    pub fn predict_calls(&self) -> Vec<HouseFeatures> {
        self.predict_calls.borrow().clone()
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.get()
    }

    pub fn train_calls(&self) -> usize {
        self.train_calls.get()
    }
}

#[async_trait(?Send)]
impl PredictionApi for MockApi {
    async fn predict(&self, request: &HouseFeatures) -> Result<PredictionResponse, PredictionError> {
        self.predict_calls.borrow_mut().push(request.clone());
        self.prediction.clone()
    }

    async fn check_health(&self) -> HealthStatus {
        self.health_calls.set(self.health_calls.get() + 1);
        self.health.clone()
    }

    async fn train_model(&self, _request: &TrainRequest) -> Result<TrainResponse, TrainingError> {
        self.train_calls.set(self.train_calls.get() + 1);
        self.training.clone()
    }

    async fn get_model_info(&self) -> ModelInfoResponse {
        self.model_info.clone()
    }

    async fn predict_batch(
        &self,
        houses: &[HouseFeatures],
    ) -> Result<BatchPredictionResponse, PredictionError> {
        let price = self.prediction.clone()?.predicted_price;
        Ok(BatchPredictionResponse {
            predictions: houses
                .iter()
                .map(|h| BatchPrediction {
                    features: FeaturesUsed {
                        area: Some(h.area),
                        bedrooms: Some(h.bedrooms),
                        ..FeaturesUsed::default()
                    },
                    predicted_price: price,
                })
                .collect(),
        })
    }

    async fn list_features(&self) -> Result<FeatureList, PredictionError> {
        Ok(FeatureList {
            features: Some(vec!["area".into()]),
            count: 1,
        })
    }
}

/// Geocoder answering every point with the same outcome.
pub struct FixedGeocoder {
    answer: Result<String, GeocodeError>,
}

impl FixedGeocoder {
    pub fn answering(name: &str) -> Self {
        Self {
            answer: Ok(name.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(GeocodeError::Request("connection refused".to_string())),
        }
    }
}

#[async_trait(?Send)]
impl ReverseGeocoder for FixedGeocoder {
    async fn reverse(&self, _point: LatLng) -> Result<String, GeocodeError> {
        self.answer.clone()
    }
}
