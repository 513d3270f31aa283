use std::collections::{HashMap, HashSet};

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use voyage_core::PlacesResult;

use crate::config::EndpointConfig;
use crate::http::{read_json, transport_error};

pub trait PlacesProvider: Send + Sync {
    async fn get_tourist_places(&self, lat: f64, lon: f64, limit: usize) -> PlacesResult;
}

/// Overpass client for named points of interest around a coordinate.
#[derive(Debug, Clone)]
pub struct PlacesAgent {
    client: Client,
    endpoint: EndpointConfig,
    radius_meters: u32,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl PlacesAgent {
    pub fn new(client: Client, endpoint: EndpointConfig, radius_meters: u32) -> Self {
        Self {
            client,
            endpoint,
            radius_meters,
        }
    }
}

impl PlacesProvider for PlacesAgent {
    #[instrument(skip(self), fields(radius = self.radius_meters))]
    async fn get_tourist_places(&self, lat: f64, lon: f64, limit: usize) -> PlacesResult {
        let query = overpass_query(lat, lon, self.radius_meters);

        let response = self
            .client
            .post(&self.endpoint.url)
            .form(&[("data", query.as_str())])
            .timeout(self.endpoint.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let payload: OverpassResponse = read_json(response).await?;
        let elements = payload.elements.len();
        let places = unique_names(
            payload
                .elements
                .into_iter()
                .filter_map(|mut element| element.tags.remove("name")),
            limit,
        );

        debug!(elements, found = places.len(), "points of interest");
        Ok(places)
    }
}

/// Attractions, museums, named parks and historic sites, as nodes and ways.
pub fn overpass_query(lat: f64, lon: f64, radius_meters: u32) -> String {
    let around = format!("(around:{radius_meters},{lat},{lon})");
    let selectors = [
        r#"["tourism"="attraction"]"#,
        r#"["tourism"="museum"]"#,
        r#"["leisure"="park"]["name"]"#,
        r#"["historic"]"#,
    ];

    let mut query = String::from("[out:json][timeout:25];\n(\n");
    for selector in selectors {
        for kind in ["node", "way"] {
            query.push_str(&format!("  {kind}{selector}{around};\n"));
        }
    }
    query.push_str(");\nout body;\n>;\nout skel qt;\n");
    query
}

/// First-seen unique names, stopping as soon as `limit` are collected.
pub fn unique_names<I>(names: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut places = Vec::new();

    if limit == 0 {
        return places;
    }

    for name in names {
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }
        places.push(name);
        if places.len() >= limit {
            break;
        }
    }

    places
}
