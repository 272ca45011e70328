use log::Level;
use wasm_bindgen::JsValue;
use web_sys::window;

const KEY_PREFIX: &str = "houseprice_";

/// Global application settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Prediction service host (e.g., "localhost" or "api.example.com")
    pub api_host: String,

    /// Prediction service port
    pub api_port: u16,

    /// Path prefix in front of every endpoint, empty by default
    pub api_path: String,

    /// Use HTTPS for API requests
    pub api_use_https: bool,

    /// Nominatim instance used to resolve map clicks to addresses
    pub geocoder_url: String,

    /// Default log level for the application
    pub log_level: Level,

    /// Enable debug mode
    pub debug_mode: bool,

    /// Toast notification duration in milliseconds
    pub toast_duration_ms: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_host: "localhost".to_string(),
            api_port: 8000,
            api_path: String::new(),
            api_use_https: false,
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            log_level: Level::Info,
            debug_mode: false,
            toast_duration_ms: 5000,
        }
    }
}

pub fn parse_log_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}

fn storage_key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

impl AppSettings {
    /// Create settings from environment/window location
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            let get = |name: &str| storage.get_item(&storage_key(name)).ok().flatten();

            if let Some(api_host) = get("api_host") {
                settings.api_host = api_host;
            }
            if let Some(port) = get("api_port").and_then(|p| p.parse::<u16>().ok()) {
                settings.api_port = port;
            }
            if let Some(api_path) = get("api_path") {
                settings.api_path = api_path;
            }
            if let Some(use_https) = get("api_use_https") {
                settings.api_use_https = use_https.to_lowercase() == "true";
            }
            if let Some(geocoder_url) = get("geocoder_url") {
                settings.geocoder_url = geocoder_url;
            }
            if let Some(level) = get("log_level").as_deref().and_then(parse_log_level) {
                settings.log_level = level;
            }
        }

        settings
    }

    /// Save settings to localStorage
    pub fn save_to_storage(&self) -> Result<(), JsValue> {
        if let Some(window) = window() {
            if let Some(storage) = window.local_storage()? {
                storage.set_item(&storage_key("api_host"), &self.api_host)?;
                storage.set_item(&storage_key("api_port"), &self.api_port.to_string())?;
                storage.set_item(&storage_key("api_path"), &self.api_path)?;
                storage.set_item(&storage_key("api_use_https"), &self.api_use_https.to_string())?;
                storage.set_item(&storage_key("geocoder_url"), &self.geocoder_url)?;
                storage.set_item(
                    &storage_key("log_level"),
                    &self.log_level.as_str().to_lowercase(),
                )?;
            }
        }
        Ok(())
    }

    /// Get the base API URL (protocol + host + port + path)
    pub fn api_base_url(&self) -> String {
        let protocol = if self.api_use_https { "https" } else { "http" };
        format!(
            "{}://{}:{}{}",
            protocol,
            self.api_host,
            self.api_port,
            self.api_path.trim_end_matches('/')
        )
    }

    /// Get the full API URL for an endpoint
    pub fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url(), endpoint)
    }
}

// Global settings instance using thread_local
use std::cell::RefCell;

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::from_environment());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Update the global settings
pub fn update_settings<F>(f: F)
where
    F: FnOnce(&mut AppSettings),
{
    SETTINGS.with(|s| {
        let mut settings = s.borrow_mut();
        f(&mut settings);
    });
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}
