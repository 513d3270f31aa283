use std::env;
use std::str::FromStr;
use std::time::Duration;

use voyage_core::ConfigError;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_PLACES_URL: &str = "https://overpass-api.de/api/interpreter";

const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_WEATHER_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_PLACES_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_PLACES_RADIUS_METERS: u32 = 15_000;
const DEFAULT_PLACES_LIMIT: usize = 5;

const MAX_TIMEOUT_SECONDS: u64 = 300;
const MAX_PLACES_RADIUS_METERS: u32 = 100_000;
const MAX_PLACES_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub geocoder: EndpointConfig,
    pub weather: EndpointConfig,
    pub places: EndpointConfig,
    /// Sent with every geocoding request; public Nominatim instances reject anonymous clients.
    pub user_agent: String,
    pub places_radius_meters: u32,
    pub places_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            geocoder: EndpointConfig::new(DEFAULT_GEOCODER_URL, DEFAULT_GEOCODER_TIMEOUT_SECONDS),
            weather: EndpointConfig::new(DEFAULT_WEATHER_URL, DEFAULT_WEATHER_TIMEOUT_SECONDS),
            places: EndpointConfig::new(DEFAULT_PLACES_URL, DEFAULT_PLACES_TIMEOUT_SECONDS),
            user_agent: default_user_agent(),
            places_radius_meters: DEFAULT_PLACES_RADIUS_METERS,
            places_limit: DEFAULT_PLACES_LIMIT,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = env_string("VOYAGE_GEOCODER_URL") {
            config.geocoder.url = url;
        }
        if let Some(url) = env_string("VOYAGE_WEATHER_URL") {
            config.weather.url = url;
        }
        if let Some(url) = env_string("VOYAGE_PLACES_URL") {
            config.places.url = url;
        }
        if let Some(seconds) = env_parse::<u64>("VOYAGE_GEOCODER_TIMEOUT_SECONDS") {
            config.geocoder.timeout = Duration::from_secs(seconds);
        }
        if let Some(seconds) = env_parse::<u64>("VOYAGE_WEATHER_TIMEOUT_SECONDS") {
            config.weather.timeout = Duration::from_secs(seconds);
        }
        if let Some(seconds) = env_parse::<u64>("VOYAGE_PLACES_TIMEOUT_SECONDS") {
            config.places.timeout = Duration::from_secs(seconds);
        }
        if let Some(user_agent) = env_string("VOYAGE_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(radius) = env_parse::<u32>("VOYAGE_PLACES_RADIUS_METERS") {
            config.places_radius_meters = radius;
        }
        if let Some(limit) = env_parse::<usize>("VOYAGE_PLACES_LIMIT") {
            config.places_limit = limit;
        }

        config.validate()?;
        Ok(config)
    }

    /// Points all three services at one host, using the public providers' paths.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let defaults = Self::default();

        Self {
            geocoder: EndpointConfig {
                url: format!("{base}/search"),
                ..defaults.geocoder
            },
            weather: EndpointConfig {
                url: format!("{base}/v1/forecast"),
                ..defaults.weather
            },
            places: EndpointConfig {
                url: format!("{base}/api/interpreter"),
                ..defaults.places
            },
            ..defaults
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, endpoint) in [
            ("geocoder", &self.geocoder),
            ("weather", &self.weather),
            ("places", &self.places),
        ] {
            if !endpoint.url.starts_with("http://") && !endpoint.url.starts_with("https://") {
                return Err(ConfigError::new(format!(
                    "{name} URL must be an HTTP or HTTPS URL, got '{}'",
                    endpoint.url
                )));
            }

            let seconds = endpoint.timeout.as_secs();
            if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
                return Err(ConfigError::new(format!(
                    "{name} timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"
                )));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::new("user agent cannot be empty"));
        }

        if self.places_radius_meters == 0 || self.places_radius_meters > MAX_PLACES_RADIUS_METERS {
            return Err(ConfigError::new(format!(
                "places radius must be between 1 and {MAX_PLACES_RADIUS_METERS} meters"
            )));
        }

        if self.places_limit == 0 || self.places_limit > MAX_PLACES_LIMIT {
            return Err(ConfigError::new(format!(
                "places limit must be between 1 and {MAX_PLACES_LIMIT}"
            )));
        }

        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("voyage-concierge/{}", env!("CARGO_PKG_VERSION"))
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|value| value.parse::<T>().ok())
}
