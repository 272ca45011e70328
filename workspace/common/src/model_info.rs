use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl HealthStatus {
    /// Status reported when the service cannot be reached.
    pub fn offline() -> Self {
        Self {
            status: "error".to_string(),
            model_loaded: false,
            model_path: None,
        }
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::offline()
    }
}

/// Evaluation metrics of a trained model.
///
/// Fields are optional because the service reports whatever its trainer
/// produced, which may be an empty map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelMetrics {
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub mae: Option<f64>,
    #[serde(default)]
    pub r2_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mse: Option<f64>,
}

/// Metadata of the model currently loaded by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    #[serde(default)]
    pub version: Option<String>,
    /// ISO-8601 timestamp, kept as the service formats it (no offset).
    #[serde(default)]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub training_samples: Option<u64>,
    #[serde(default)]
    pub feature_count: usize,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub metrics: Option<ModelMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl ModelInfo {
    /// Version prefix shown in compact badges (`20240501_103000` -> `20240501`).
    pub fn short_version(&self) -> &str {
        self.version
            .as_deref()
            .and_then(|v| v.split('_').next())
            .filter(|v| !v.is_empty())
            .unwrap_or("1.0")
    }

    /// The first `n` feature names and how many were left out.
    pub fn feature_preview(&self, n: usize) -> (&[String], usize) {
        let shown = n.min(self.features.len());
        (&self.features[..shown], self.features.len() - shown)
    }
}

/// Body of `GET /model/info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfoResponse {
    pub status: String,
    #[serde(default)]
    pub model_info: Option<ModelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ModelInfoResponse {
    /// Response synthesized when the service cannot be reached.
    pub fn unavailable() -> Self {
        Self {
            status: "error".to_string(),
            model_info: None,
            message: None,
        }
    }

    /// The model info, if this response is a successful fetch.
    pub fn loaded(&self) -> Option<&ModelInfo> {
        if self.status == "success" {
            self.model_info.as_ref()
        } else {
            None
        }
    }

    pub fn into_loaded(self) -> Option<ModelInfo> {
        if self.status == "success" {
            self.model_info
        } else {
            None
        }
    }
}

/// Body of `GET /features`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureList {
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub count: usize,
}
