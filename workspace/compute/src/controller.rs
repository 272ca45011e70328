//! Form/controller logic with the remote effects made explicit.
//!
//! The [`Controller`] owns the service client and the prediction log. Its
//! lifecycle hooks return [`SessionUpdate`]s instead of mutating UI state, so
//! each client decides how to apply them (Yew state handles in the browser,
//! [`SessionState`] elsewhere).

use std::cell::Cell;

use common::{HealthStatus, ModelInfo, PredictionRecord, TrainRequest, TrainResponse};
use tracing::{debug, error, info, instrument, trace, warn};
use validator::Validate;

use crate::api::PredictionApi;
use crate::error::{SubmitError, TrainingError};
use crate::form::FormState;
use crate::history::{LogStorage, PredictionLog};

/// A state change produced by a lifecycle hook.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Health(HealthStatus),
    /// Emitted only for successful fetches; a failed fetch keeps the old info.
    ModelInfo(ModelInfo),
}

/// Passive UI state driven by the lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub health: HealthStatus,
    pub model_info: Option<ModelInfo>,
}

impl SessionState {
    pub fn apply(&mut self, update: SessionUpdate) {
        match update {
            SessionUpdate::Health(health) => self.health = health,
            SessionUpdate::ModelInfo(info) => self.model_info = Some(info),
        }
    }

    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = SessionUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }

    pub fn model_ready(&self) -> bool {
        self.health.model_loaded
    }
}

/// Clears an in-flight flag when dropped, whatever way the action ends.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct Controller<A, S> {
    api: A,
    history: PredictionLog<S>,
    predicting: Cell<bool>,
    training: Cell<bool>,
}

impl<A: PredictionApi, S: LogStorage> Controller<A, S> {
    pub fn new(api: A, history: PredictionLog<S>) -> Self {
        Self {
            api,
            history,
            predicting: Cell::new(false),
            training: Cell::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn history(&self) -> &PredictionLog<S> {
        &self.history
    }

    pub fn is_predicting(&self) -> bool {
        self.predicting.get()
    }

    pub fn is_training(&self) -> bool {
        self.training.get()
    }

    /// Fetches health and model info. Neither call can fail.
    #[instrument(skip(self))]
    pub async fn on_init(&self) -> Vec<SessionUpdate> {
        trace!("Refreshing health and model info");
        let health = self.api.check_health().await;
        debug!("Health: status={} model_loaded={}", health.status, health.model_loaded);

        let mut updates = vec![SessionUpdate::Health(health)];
        match self.api.get_model_info().await.into_loaded() {
            Some(info) => updates.push(SessionUpdate::ModelInfo(info)),
            None => debug!("No model info available, keeping previous"),
        }
        updates
    }

    /// Refreshes passive state after a training run that succeeded.
    pub async fn on_after_train(&self, result: &TrainResponse) -> Vec<SessionUpdate> {
        if result.is_success() {
            self.on_init().await
        } else {
            debug!("Training finished with status '{}', nothing to refresh", result.status);
            Vec::new()
        }
    }

    /// Submits the form. The log is appended only after the service answered
    /// successfully; on any error the log and the form are left untouched.
    #[instrument(skip(self, form, health))]
    pub async fn submit(
        &self,
        form: &FormState,
        health: &HealthStatus,
    ) -> Result<PredictionRecord, SubmitError> {
        if !health.model_loaded {
            warn!("Prediction rejected: model not loaded");
            return Err(SubmitError::ModelNotReady);
        }
        let Some(_guard) = InFlight::acquire(&self.predicting) else {
            warn!("Prediction rejected: another one is in progress");
            return Err(SubmitError::Busy);
        };

        let request = form.to_request()?;
        debug!(
            "Predicting area={} bedrooms={} bathrooms={} floors={}",
            request.area, request.bedrooms, request.bathrooms, request.floors
        );

        let response = self.api.predict(&request).await.map_err(|e| {
            error!("Prediction failed: {}", e);
            e
        })?;
        info!("Predicted price {}", response.predicted_price);

        let record = PredictionRecord::from_response(response, chrono::Utc::now());
        if let Err(e) = self.history.append_record(record.clone()) {
            error!("Failed to save prediction to history: {}", e);
        }
        Ok(record)
    }

    /// Runs a training job and returns the refreshed session state with it.
    #[instrument(skip(self))]
    pub async fn train(
        &self,
        request: &TrainRequest,
    ) -> Result<(TrainResponse, Vec<SessionUpdate>), TrainingError> {
        request.validate().map_err(|e| {
            warn!("Training request rejected: {}", e);
            TrainingError::new(format!(
                "Sample count must be between {} and {}",
                common::MIN_SAMPLES,
                common::MAX_SAMPLES
            ))
        })?;
        let Some(_guard) = InFlight::acquire(&self.training) else {
            warn!("Training rejected: another run is in progress");
            return Err(TrainingError::new("Training is already in progress"));
        };

        info!(
            "Starting training (generate_sample={}, n_samples={})",
            request.generate_sample, request.n_samples
        );
        let response = self.api.train_model(request).await.map_err(|e| {
            error!("Training failed: {}", e);
            e
        })?;
        info!("Training finished: {}", response.message);

        let updates = self.on_after_train(&response).await;
        Ok((response, updates))
    }
}
