pub mod aggregate;
pub mod api;
pub mod controller;
pub mod error;
pub mod form;
pub mod history;
pub mod location;

#[cfg(test)]
pub(crate) mod testing;

use api::PredictionApi;
use controller::Controller;
use history::{LogStorage, PredictionLog};

/// Returns a controller wired the way every client uses it: the given
/// service client and a prediction log with the default key and cap.
pub fn default_controller<A, S>(api: A, storage: S) -> Controller<A, S>
where
    A: PredictionApi,
    S: LogStorage,
{
    Controller::new(api, PredictionLog::new(storage))
}
