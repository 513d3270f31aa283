use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    clarifications_total: AtomicU64,
    geocode_failures_total: AtomicU64,
    weather_lookups_total: AtomicU64,
    weather_failures_total: AtomicU64,
    places_lookups_total: AtomicU64,
    places_failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub clarifications_total: u64,
    pub geocode_failures_total: u64,
    pub weather_lookups_total: u64,
    pub weather_failures_total: u64,
    pub places_lookups_total: u64,
    pub places_failures_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_clarification(&self) {
        self.clarifications_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_geocode_failure(&self) {
        self.geocode_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_weather_lookup(&self, failed: bool) {
        self.weather_lookups_total.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.weather_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_places_lookup(&self, failed: bool) {
        self.places_lookups_total.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.places_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            clarifications_total: self.clarifications_total.load(Ordering::Relaxed),
            geocode_failures_total: self.geocode_failures_total.load(Ordering::Relaxed),
            weather_lookups_total: self.weather_lookups_total.load(Ordering::Relaxed),
            weather_failures_total: self.weather_failures_total.load(Ordering::Relaxed),
            places_lookups_total: self.places_lookups_total.load(Ordering::Relaxed),
            places_failures_total: self.places_failures_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,voyage_api=info,voyage_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
