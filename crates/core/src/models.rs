use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// What the user asked about, derived from keyword membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub wants_weather: bool,
    pub wants_places: bool,
}

impl Intent {
    pub fn new(wants_weather: bool, wants_places: bool) -> Self {
        Self {
            wants_weather,
            wants_places,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.wants_weather && !self.wants_places
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl GeoLocation {
    /// Builds a location, rejecting coordinates outside decimal-degree range.
    pub fn new(lat: f64, lon: f64, display_name: impl Into<String>) -> Result<Self, LookupError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(LookupError::decode(format!("latitude out of range: {lat}")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(LookupError::decode(format!("longitude out of range: {lon}")));
        }

        Ok(Self {
            lat,
            lon,
            display_name: display_name.into(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent, 0-100.
    pub rain_chance: u8,
}

pub type GeoResult = Result<GeoLocation, LookupError>;
pub type WeatherResult = Result<CurrentWeather, LookupError>;
pub type PlacesResult = Result<Vec<String>, LookupError>;

/// Output of the offline probe: what extraction and intent parsing see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub place: Option<String>,
    pub intent: Intent,
}
