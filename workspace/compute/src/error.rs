use thiserror::Error;
use validator::ValidationErrors;

/// Message used when a prediction fails without a server-provided detail.
pub const PREDICTION_FALLBACK: &str = "Could not reach the prediction server";
/// Message used when training fails without a server-provided detail.
pub const TRAINING_FALLBACK: &str = "Model training failed";

/// A failed prediction request. The message is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct PredictionError {
    pub message: String,
}

impl PredictionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds the error from an error response body, falling back to the
    /// generic message when the body carries no usable `detail`.
    pub fn from_body(body: &str) -> Self {
        Self::new(common::error_detail(body).unwrap_or_else(|| PREDICTION_FALLBACK.to_string()))
    }

    pub fn fallback() -> Self {
        Self::new(PREDICTION_FALLBACK)
    }
}

/// A failed training run. Kept apart from [`PredictionError`] so callers
/// cannot confuse the two user-initiated actions.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TrainingError {
    pub message: String,
}

impl TrainingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_body(body: &str) -> Self {
        Self::new(common::error_detail(body).unwrap_or_else(|| TRAINING_FALLBACK.to_string()))
    }

    pub fn fallback() -> Self {
        Self::new(TRAINING_FALLBACK)
    }
}

/// Form input that could not be turned into a prediction request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("invalid input: {0}")]
    Invalid(String),
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        FormError::Invalid(errors.to_string())
    }
}

/// Failure of the key-value store behind the prediction log.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),

    #[error("failed to encode prediction log: {0}")]
    Encode(String),
}

/// Reverse geocoding failure. Never shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(String),

    #[error("no address found for this point")]
    NotFound,
}

/// Why a prediction submission did not produce a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("the model is not loaded yet, train it first")]
    ModelNotReady,

    #[error("a prediction is already in progress")]
    Busy,

    #[error(transparent)]
    InvalidForm(#[from] FormError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}
