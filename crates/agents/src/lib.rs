pub mod config;
pub mod geocoding;
pub mod http;
pub mod places;
pub mod weather;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use voyage_core::reply::{self, PlacesRequest};
use voyage_core::{
    compose_reply, extract_place_name, parse_user_intent, title_case, GeoLocation, PlacesResult,
    WeatherResult,
};
use voyage_observability::AppMetrics;

pub use config::{AgentConfig, EndpointConfig};
pub use geocoding::{Geocoder, GeocodingService};
pub use places::{PlacesAgent, PlacesProvider};
pub use weather::{WeatherAgent, WeatherProvider};

/// Answers free-text travel questions by chaining geocoding, weather and
/// points-of-interest lookups. Constructed once and shared by the shells.
pub struct TourismAgent<G = GeocodingService, W = WeatherAgent, P = PlacesAgent>
where
    G: Geocoder,
    W: WeatherProvider,
    P: PlacesProvider,
{
    geocoder: G,
    weather: W,
    places: P,
    places_limit: usize,
    metrics: Arc<AppMetrics>,
}

impl TourismAgent {
    pub fn from_config(config: &AgentConfig, metrics: Arc<AppMetrics>) -> Result<Self> {
        config.validate()?;
        let client = http::build_client()?;

        Ok(Self::new(
            GeocodingService::new(
                client.clone(),
                config.geocoder.clone(),
                config.user_agent.clone(),
            ),
            WeatherAgent::new(client.clone(), config.weather.clone()),
            PlacesAgent::new(client, config.places.clone(), config.places_radius_meters),
            metrics,
        )
        .with_places_limit(config.places_limit))
    }
}

impl<G, W, P> TourismAgent<G, W, P>
where
    G: Geocoder,
    W: WeatherProvider,
    P: PlacesProvider,
{
    pub fn new(geocoder: G, weather: W, places: P, metrics: Arc<AppMetrics>) -> Self {
        Self {
            geocoder,
            weather,
            places,
            places_limit: 5,
            metrics,
        }
    }

    pub fn with_places_limit(mut self, limit: usize) -> Self {
        self.places_limit = limit;
        self
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    /// Always produces a user-facing reply; lookup failures become sentences.
    #[instrument(skip(self, text), fields(request_id = %Uuid::new_v4()))]
    pub async fn process_request(&self, text: &str) -> String {
        let started = Instant::now();
        self.metrics.inc_request();

        let reply = self.answer(text, started).await;

        self.metrics.observe_latency(started.elapsed());
        reply
    }

    async fn answer(&self, text: &str, started: Instant) -> String {
        let Some(place_name) = extract_place_name(text) else {
            self.metrics.inc_clarification();
            debug!("no destination in request");
            return reply::CLARIFY_DESTINATION.to_string();
        };

        let location = match self.geocoder.get_coordinates(&place_name).await {
            Ok(location) => location,
            Err(error) => {
                self.metrics.inc_geocode_failure();
                warn!(place = %place_name, %error, "geocoding failed");
                return reply::place_not_found(&place_name);
            }
        };

        let place_display = title_case(&place_name);
        let intent = parse_user_intent(text);
        let places_request = if intent.wants_places {
            Some(PlacesRequest::Explicit)
        } else if intent.is_empty() {
            Some(PlacesRequest::Default)
        } else {
            None
        };

        let weather_lookup = async {
            if intent.wants_weather {
                Some(self.lookup_weather(&location).await)
            } else {
                None
            }
        };
        let places_lookup = async {
            match places_request {
                Some(_) => Some(self.lookup_places(&location).await),
                None => None,
            }
        };
        let (weather, places) = tokio::join!(weather_lookup, places_lookup);

        info!(
            place = %place_display,
            lat = location.lat,
            lon = location.lon,
            wants_weather = intent.wants_weather,
            wants_places = intent.wants_places,
            latency_ms = started.elapsed().as_millis() as u64,
            "request answered"
        );

        compose_reply(
            &place_display,
            weather.as_ref(),
            places_request.zip(places.as_ref()),
        )
    }

    async fn lookup_weather(&self, location: &GeoLocation) -> WeatherResult {
        let result = self.weather.get_weather(location.lat, location.lon).await;
        self.metrics.record_weather_lookup(result.is_err());
        if let Err(error) = &result {
            warn!(%error, "weather lookup failed");
        }
        result
    }

    async fn lookup_places(&self, location: &GeoLocation) -> PlacesResult {
        let result = self
            .places
            .get_tourist_places(location.lat, location.lon, self.places_limit)
            .await;
        self.metrics.record_places_lookup(result.is_err());
        if let Err(error) = &result {
            warn!(%error, "places lookup failed");
        }
        result
    }
}
