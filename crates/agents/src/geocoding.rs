use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use voyage_core::{GeoLocation, GeoResult, LookupError};

use crate::config::EndpointConfig;
use crate::http::{read_json, transport_error};

pub trait Geocoder: Send + Sync {
    async fn get_coordinates(&self, place_name: &str) -> GeoResult;
}

/// Nominatim search client.
#[derive(Debug, Clone)]
pub struct GeocodingService {
    client: Client,
    endpoint: EndpointConfig,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl GeocodingService {
    pub fn new(client: Client, endpoint: EndpointConfig, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            endpoint,
            user_agent: user_agent.into(),
        }
    }
}

impl Geocoder for GeocodingService {
    #[instrument(skip(self), fields(url = %self.endpoint.url))]
    async fn get_coordinates(&self, place_name: &str) -> GeoResult {
        let response = self
            .client
            .get(&self.endpoint.url)
            .query(&[("q", place_name), ("format", "json"), ("limit", "1")])
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(self.endpoint.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let hits: Vec<SearchHit> = read_json(response).await?;
        let Some(hit) = hits.into_iter().next() else {
            return Err(LookupError::NotFound);
        };

        let lat = parse_coordinate("lat", &hit.lat)?;
        let lon = parse_coordinate("lon", &hit.lon)?;
        let location = GeoLocation::new(
            lat,
            lon,
            hit.display_name.unwrap_or_else(|| place_name.to_string()),
        )?;

        debug!(lat, lon, display_name = %location.display_name, "geocoded");
        Ok(location)
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, LookupError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| LookupError::decode(format!("{field} is not a number: '{raw}'")))
}
