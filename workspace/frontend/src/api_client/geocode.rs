use async_trait::async_trait;
use common::{LatLng, ReverseGeocodeResponse};
use compute::api::ReverseGeocoder;
use compute::error::GeocodeError;
use gloo_net::http::Request;

use crate::settings;

/// Reverse geocoding against the configured Nominatim instance.
#[derive(Debug, Clone, PartialEq)]
pub struct NominatimGeocoder {
    base_url: String,
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self {
            base_url: settings::get_settings()
                .geocoder_url
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[async_trait(?Send)]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, point: LatLng) -> Result<String, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        log::debug!("Reverse geocoding {:?}", point);

        let lat = point.lat.to_string();
        let lon = point.lng.to_string();
        let response = Request::get(&url)
            .query([("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        if !response.ok() {
            return Err(GeocodeError::Request(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: ReverseGeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        body.display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(GeocodeError::NotFound)
    }
}
