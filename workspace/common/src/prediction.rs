use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /predict`.
///
/// Optional fields serialize as `null` when absent, the way the service
/// expects them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct HouseFeatures {
    /// Floor area in square meters
    #[validate(range(exclusive_min = 0.0))]
    pub area: f64,
    #[validate(range(min = 1))]
    pub bedrooms: u32,
    #[validate(range(min = 1))]
    pub bathrooms: u32,
    #[serde(default = "default_floors")]
    #[validate(range(min = 1))]
    pub floors: u32,
    pub year_built: Option<i32>,
    /// Location quality score in `[0, 10]`
    #[validate(range(min = 0.0, max = 10.0))]
    pub location_score: Option<f64>,
    /// Free-text address, either typed or resolved from the map
    pub location: Option<String>,
}

fn default_floors() -> u32 {
    1
}

impl HouseFeatures {
    /// Creates a request with the required fields and every optional one unset.
    pub fn new(area: f64, bedrooms: u32, bathrooms: u32) -> Self {
        Self {
            area,
            bedrooms,
            bathrooms,
            floors: default_floors(),
            year_built: None,
            location_score: None,
            location: None,
        }
    }
}

/// Features echoed back by the service alongside a prediction.
///
/// Every field is optional: records written by older clients may lack some
/// of them, and the aggregations skip what is missing instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeaturesUsed {
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub floors: Option<u32>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub location_score: Option<f64>,
}

/// Success body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub predicted_price: f64,
    #[serde(default)]
    pub features_used: FeaturesUsed,
}

/// One cached prediction: the service response plus the moment it was stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub predicted_price: f64,
    #[serde(default)]
    pub features_used: FeaturesUsed,
    pub timestamp: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn from_response(response: PredictionResponse, timestamp: DateTime<Utc>) -> Self {
        Self {
            predicted_price: response.predicted_price,
            features_used: response.features_used,
            timestamp,
        }
    }
}

/// Request body for `POST /predict/batch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchPredictionRequest {
    pub houses: Vec<HouseFeatures>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchPrediction {
    #[serde(default)]
    pub features: FeaturesUsed,
    pub predicted_price: f64,
}

/// Success body of `POST /predict/batch`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<BatchPrediction>,
}
