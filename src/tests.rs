#[cfg(test)]
mod integration_tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use common::{FeaturesUsed, HouseFeatures, LatLng, PredictionResponse, TrainRequest};
    use compute::api::{PredictionApi, ReverseGeocoder};
    use compute::controller::{Controller, SessionState};
    use compute::error::{GeocodeError, PREDICTION_FALLBACK, SubmitError, TRAINING_FALLBACK};
    use compute::form::{FormField, FormState};
    use compute::history::{LogStorage, MAX_RECORDS, PredictionLog, STORAGE_KEY};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::cli::commands::history::render_dashboard;
    use crate::cli::commands::predict::read_batch_file;
    use crate::cli::commands::train::train_request;
    use crate::cli::Cli;
    use crate::client::{HttpPredictionApi, NominatimGeocoder};
    use crate::config::{DEFAULT_API_URL, load_config};
    use crate::output::OutputFormat;
    use crate::storage::FileStorage;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn api_for(server: &MockServer) -> HttpPredictionApi {
        HttpPredictionApi::new(&server.uri(), TIMEOUT).unwrap()
    }

    /// Nothing listens on port 1, so every request fails at connect time.
    fn unreachable_api() -> HttpPredictionApi {
        HttpPredictionApi::new("http://127.0.0.1:1", TIMEOUT).unwrap()
    }

    fn prediction_body(price: f64, area: f64) -> serde_json::Value {
        json!({
            "predicted_price": price,
            "features_used": {
                "area": area,
                "bedrooms": 3,
                "bathrooms": 2,
                "floors": 1,
                "year_built": null,
                "location_score": null
            }
        })
    }

    async fn mount_ready_health(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "model_loaded": true,
                "model_path": "models/xgb.pkl"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_check_health_unreachable_reports_offline() {
        let health = unreachable_api().check_health().await;
        assert_eq!(health.status, "error");
        assert!(!health.model_loaded);
    }

    #[tokio::test]
    async fn test_check_health_server_error_reports_offline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let health = api_for(&server).check_health().await;
        assert!(!health.model_loaded);
    }

    #[tokio::test]
    async fn test_predict_sends_request_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(body_partial_json(json!({"area": 150.5, "bedrooms": 3, "floors": 1})))
            .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(3.456e9, 150.5)))
            .expect(1)
            .mount(&server)
            .await;

        let request = HouseFeatures::new(150.5, 3, 2);
        let response = api_for(&server).predict(&request).await.unwrap();

        assert_eq!(response.predicted_price, 3.456e9);
        assert_eq!(response.features_used.area, Some(150.5));
        assert_eq!(response.features_used.bedrooms, Some(3));
    }

    #[tokio::test]
    async fn test_predict_uses_server_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "model not trained"})),
            )
            .mount(&server)
            .await;

        let err = api_for(&server)
            .predict(&HouseFeatures::new(100.0, 2, 1))
            .await
            .unwrap_err();
        assert_eq!(err.message, "model not trained");
    }

    #[tokio::test]
    async fn test_predict_without_detail_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .predict(&HouseFeatures::new(100.0, 2, 1))
            .await
            .unwrap_err();
        assert_eq!(err.message, PREDICTION_FALLBACK);

        let err = unreachable_api()
            .predict(&HouseFeatures::new(100.0, 2, 1))
            .await
            .unwrap_err();
        assert_eq!(err.message, PREDICTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_train_error_detail_and_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/train"))
            .and(body_partial_json(json!({"generate_sample": true, "n_samples": 2000})))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "dataset missing"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/train"))
            .and(body_partial_json(json!({"generate_sample": false})))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": null})))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let err = api
            .train_model(&TrainRequest::sample_data(2000))
            .await
            .unwrap_err();
        assert_eq!(err.message, "dataset missing");

        let err = api
            .train_model(&TrainRequest::real_data(None))
            .await
            .unwrap_err();
        assert_eq!(err.message, TRAINING_FALLBACK);
    }

    #[tokio::test]
    async fn test_model_info_no_model_is_not_loaded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/model/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "no_model",
                "message": "Model has not been trained"
            })))
            .mount(&server)
            .await;

        let response = api_for(&server).get_model_info().await;
        assert_eq!(response.status, "no_model");
        assert!(response.loaded().is_none());

        let unreachable = unreachable_api().get_model_info().await;
        assert_eq!(unreachable.status, "error");
        assert!(unreachable.loaded().is_none());
    }

    #[tokio::test]
    async fn test_predict_batch_and_features() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict/batch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "predictions": [
                    {"features": {"area": 80.0, "bedrooms": 2}, "predicted_price": 1.5e9},
                    {"features": {"area": 200.0, "bedrooms": 4}, "predicted_price": 4.2e9}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": ["area", "bedrooms", "bathrooms"],
                "count": 3
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let houses = vec![HouseFeatures::new(80.0, 2, 1), HouseFeatures::new(200.0, 4, 3)];
        let batch = api.predict_batch(&houses).await.unwrap();
        assert_eq!(batch.predictions.len(), 2);
        assert_eq!(batch.predictions[1].features.area, Some(200.0));

        let features = api.list_features().await.unwrap();
        assert_eq!(features.count, 3);
        assert_eq!(features.features.unwrap()[0], "area");
    }

    #[tokio::test]
    async fn test_nominatim_reverse_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .and(query_param("lat", "21.0278"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "display_name": "Hoan Kiem, Ha Noi, Vietnam"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("lat", "0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "Unable to geocode"})),
            )
            .mount(&server)
            .await;

        let geocoder = NominatimGeocoder::new(&server.uri(), TIMEOUT).unwrap();
        let name = geocoder
            .reverse(LatLng::new(21.0278, 105.8342))
            .await
            .unwrap();
        assert_eq!(name, "Hoan Kiem, Ha Noi, Vietnam");

        let err = geocoder.reverse(LatLng::new(0.0, 0.0)).await.unwrap_err();
        assert_eq!(err, GeocodeError::NotFound);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("history.json"));

        // Missing file reads as empty
        assert_eq!(storage.read(STORAGE_KEY).unwrap(), None);

        storage.write(STORAGE_KEY, "[]").unwrap();
        storage.write("other", "42").unwrap();
        assert_eq!(storage.read(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.read("other").unwrap().as_deref(), Some("42"));

        // No temp file left behind
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_file_storage_replaces_corrupted_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");
        std::fs::write(&file, "{not json").unwrap();

        let log = PredictionLog::new(FileStorage::new(&file));
        assert!(log.load_all().is_empty());

        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let response = PredictionResponse {
            predicted_price: 2.0e9,
            features_used: FeaturesUsed::default(),
        };
        log.append_at(response, at).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_file_backed_log_keeps_last_hundred_across_reopen() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        {
            let log = PredictionLog::new(FileStorage::new(&file));
            for i in 1..=101 {
                let response = PredictionResponse {
                    predicted_price: i as f64,
                    features_used: FeaturesUsed::default(),
                };
                log.append_at(response, start + chrono::Duration::minutes(i))
                    .unwrap();
            }
        }

        let reopened = PredictionLog::new(FileStorage::new(&file));
        let records = reopened.load_all();
        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records.first().unwrap().predicted_price, 2.0);
        assert_eq!(records.last().unwrap().predicted_price, 101.0);
    }

    #[tokio::test]
    async fn test_controller_submit_persists_to_file() {
        let server = MockServer::start().await;
        mount_ready_health(&server).await;
        Mock::given(method("GET"))
            .and(path("/model/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "model_info": {"version": "20240501_103000", "feature_count": 1, "features": ["area"]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(prediction_body(3.0e9, 150.5)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");
        let controller = Controller::new(
            api_for(&server),
            PredictionLog::new(FileStorage::new(&file)),
        );

        let mut session = SessionState::default();
        session.apply_all(controller.on_init().await);
        assert!(session.model_ready());
        assert_eq!(
            session.model_info.as_ref().map(|i| i.short_version()),
            Some("20240501")
        );

        let form = FormState::default()
            .with(FormField::Area, "150.5")
            .with(FormField::Bedrooms, "3")
            .with(FormField::Bathrooms, "2");
        let record = controller.submit(&form, &session.health).await.unwrap();
        assert_eq!(record.features_used.area, Some(150.5));

        let reopened = PredictionLog::new(FileStorage::new(&file));
        assert_eq!(reopened.len(), 1);
    }

    #[tokio::test]
    async fn test_controller_rejects_when_service_offline() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("history.json");
        let controller = Controller::new(unreachable_api(), PredictionLog::new(FileStorage::new(&file)));

        let mut session = SessionState::default();
        session.apply_all(controller.on_init().await);
        assert!(!session.model_ready());
        assert!(session.model_info.is_none());

        let form = FormState::default()
            .with(FormField::Area, "80")
            .with(FormField::Bedrooms, "2")
            .with(FormField::Bathrooms, "1");
        let err = controller.submit(&form, &session.health).await.unwrap_err();
        assert_eq!(err, SubmitError::ModelNotReady);
        assert!(!file.exists());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("houseprice.toml");
        std::fs::write(
            &file,
            "api_url = \"http://models.internal:9000\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = load_config(Some(&file)).unwrap();
        assert_eq!(config.api_url, "http://models.internal:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.history_path.to_str(), Some("house_predictions.json"));
    }

    #[test]
    fn test_load_config_requires_explicit_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("houseprice.toml");
        std::fs::write(&file, "").unwrap();
        let config = load_config(Some(&file)).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);

        let cli = Cli::parse_from([
            "houseprice",
            "--api-url",
            "http://10.0.0.5:8000",
            "--history",
            "/tmp/h.json",
            "--format",
            "json",
            "history",
            "--last",
            "5",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);

        let config = cli.apply_overrides(config);
        assert_eq!(config.api_url, "http://10.0.0.5:8000");
        assert_eq!(config.history_path.to_str(), Some("/tmp/h.json"));
    }

    #[test]
    fn test_train_request_from_flags() {
        let sample = train_request(Some(2000), None);
        assert!(sample.generate_sample);
        assert_eq!(sample.n_samples, 2000);

        let real = train_request(None, Some("data/houses.csv".to_string()));
        assert!(!real.generate_sample);
        assert_eq!(real.data_path.as_deref(), Some("data/houses.csv"));
    }

    #[test]
    fn test_read_batch_file_accepts_both_shapes() {
        let dir = TempDir::new().unwrap();
        let bare = dir.path().join("bare.json");
        std::fs::write(
            &bare,
            r#"[{"area": 80.0, "bedrooms": 2, "bathrooms": 1}]"#,
        )
        .unwrap();
        let wrapped = dir.path().join("wrapped.json");
        std::fs::write(
            &wrapped,
            r#"{"houses": [{"area": 80.0, "bedrooms": 2, "bathrooms": 1, "floors": 2}]}"#,
        )
        .unwrap();

        let houses = read_batch_file(&bare).unwrap();
        assert_eq!(houses[0].floors, 1);
        let houses = read_batch_file(&wrapped).unwrap();
        assert_eq!(houses[0].floors, 2);
    }

    #[test]
    fn test_read_batch_file_rejects_invalid_house() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bad.json");
        std::fs::write(&file, r#"[{"area": 0.0, "bedrooms": 2, "bathrooms": 1}]"#).unwrap();

        let err = read_batch_file(&file).unwrap_err();
        assert!(err.to_string().contains("House #1"));
    }

    #[test]
    fn test_render_empty_dashboard() {
        let snapshot = compute::aggregate::DashboardSnapshot::build(&[], 10);
        assert_eq!(render_dashboard(&snapshot), "No predictions yet");

        let json = OutputFormat::Json
            .render(&snapshot, render_dashboard)
            .unwrap();
        assert!(json.contains("\"count\": 0"));
    }
}
