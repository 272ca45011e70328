use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model_info::ModelMetrics;

/// Smallest sample count accepted for synthetic training data.
pub const MIN_SAMPLES: u32 = 1_000;
/// Largest sample count accepted for synthetic training data.
pub const MAX_SAMPLES: u32 = 100_000;

/// Request body for `POST /train`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct TrainRequest {
    pub generate_sample: bool,
    #[validate(range(min = 1000, max = 100000))]
    pub n_samples: u32,
    /// CSV path on the server; the service picks its default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self {
            generate_sample: false,
            n_samples: 50_000,
            data_path: None,
        }
    }
}

impl TrainRequest {
    /// Training on the real dataset found at `data_path` (or the server default).
    pub fn real_data(data_path: Option<String>) -> Self {
        Self {
            data_path: data_path.filter(|p| !p.trim().is_empty()),
            ..Self::default()
        }
    }

    /// Training on `n_samples` freshly generated rows.
    pub fn sample_data(n_samples: u32) -> Self {
        Self {
            generate_sample: true,
            n_samples,
            data_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainPerformance {
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
    #[serde(default)]
    pub feature_count: usize,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// Success body of `POST /train`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(default)]
    pub performance: Option<TrainPerformance>,
}

impl TrainResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_path_omitted_when_absent() {
        let json = serde_json::to_value(TrainRequest::sample_data(5_000)).unwrap();
        assert_eq!(json["generate_sample"], true);
        assert_eq!(json["n_samples"], 5_000);
        assert!(json.get("data_path").is_none());
    }

    #[test]
    fn test_blank_data_path_is_dropped() {
        assert_eq!(TrainRequest::real_data(Some("  ".to_string())).data_path, None);
        assert_eq!(
            TrainRequest::real_data(Some("data/house_data.csv".to_string())).data_path,
            Some("data/house_data.csv".to_string())
        );
    }

    #[test]
    fn test_sample_bounds() {
        assert!(TrainRequest::sample_data(MIN_SAMPLES).validate().is_ok());
        assert!(TrainRequest::sample_data(MAX_SAMPLES).validate().is_ok());
        assert!(TrainRequest::sample_data(MIN_SAMPLES - 1).validate().is_err());
        assert!(TrainRequest::sample_data(MAX_SAMPLES + 1).validate().is_err());
    }

    #[test]
    fn test_train_response_with_empty_metrics() {
        let json = r#"{
            "status": "success",
            "message": "Model trained",
            "model_path": "models/xgb.pkl",
            "performance": {"metrics": {}, "feature_count": 2, "features": ["area", "bedrooms"]}
        }"#;
        let response: TrainResponse = serde_json::from_str(json).unwrap();
        assert!(response.is_success());
        let performance = response.performance.unwrap();
        assert_eq!(performance.metrics, Some(ModelMetrics::default()));
        assert_eq!(performance.feature_count, 2);
    }
}
