use serde::{Deserialize, Serialize};

/// A point on the map in WGS84 degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Initial map center: Ho Chi Minh City.
pub const DEFAULT_POSITION: LatLng = LatLng::new(10.762622, 106.660172);

/// The part of a Nominatim `/reverse?format=json` body the clients use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub display_name: Option<String>,
}
