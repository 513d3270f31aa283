use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use voyage_core::{CurrentWeather, LookupError, WeatherResult};

use crate::config::EndpointConfig;
use crate::http::{read_json, transport_error};

const CURRENT_FIELDS: &str = "temperature_2m,precipitation_probability";

pub trait WeatherProvider: Send + Sync {
    async fn get_weather(&self, lat: f64, lon: f64) -> WeatherResult;
}

/// Open-Meteo current conditions client.
#[derive(Debug, Clone)]
pub struct WeatherAgent {
    client: Client,
    endpoint: EndpointConfig,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(rename = "temperature_2m")]
    temperature: Option<f64>,
    #[serde(rename = "precipitation_probability")]
    rain_chance: Option<f64>,
}

impl WeatherAgent {
    pub fn new(client: Client, endpoint: EndpointConfig) -> Self {
        Self { client, endpoint }
    }
}

impl WeatherProvider for WeatherAgent {
    #[instrument(skip(self))]
    async fn get_weather(&self, lat: f64, lon: f64) -> WeatherResult {
        let latitude = lat.to_string();
        let longitude = lon.to_string();

        let response = self
            .client
            .get(&self.endpoint.url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
            ])
            .timeout(self.endpoint.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let forecast: ForecastResponse = read_json(response).await?;
        let current = forecast
            .current
            .ok_or_else(|| LookupError::decode("response has no current conditions"))?;
        let temperature = current
            .temperature
            .ok_or_else(|| LookupError::decode("current conditions lack temperature_2m"))?;

        let weather = CurrentWeather {
            temperature,
            rain_chance: rain_chance_percent(current.rain_chance),
        };
        debug!(
            temperature = weather.temperature,
            rain_chance = weather.rain_chance,
            "current weather"
        );
        Ok(weather)
    }
}

fn rain_chance_percent(probability: Option<f64>) -> u8 {
    match probability {
        Some(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}
