use crate::models::{CurrentWeather, PlacesResult, WeatherResult};

pub const CLARIFY_DESTINATION: &str =
    "I couldn't figure out which place you want to visit. Could you please mention the destination?";
pub const PLACES_HEADER_AFTER_WEATHER: &str = "And these are the places you can go:";

pub fn place_not_found(raw_place: &str) -> String {
    format!(
        "I'm sorry, I don't know if '{raw_place}' exists or I couldn't find it. Could you check the spelling or try a different place?"
    )
}

pub fn weather_line(place: &str, weather: &CurrentWeather) -> String {
    format!(
        "In {place} it's currently {}°C with a {}% chance of rain.",
        weather.temperature, weather.rain_chance
    )
}

pub fn weather_unavailable(place: &str) -> String {
    format!("I couldn't fetch the weather for {place} right now.")
}

pub fn places_header(place: &str) -> String {
    format!("In {place} these are the places you can go:")
}

pub fn place_bullet(name: &str) -> String {
    format!("  • {name}")
}

pub fn places_unavailable(place: &str) -> String {
    format!("I couldn't find popular tourist spots in {place} right now.")
}

pub fn nothing_to_say(place: &str) -> String {
    format!("I found {place}, but I'm not sure what you'd like to know about it.")
}

/// How a places lookup entered the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesRequest {
    /// The user asked for places; an empty or failed lookup gets an apology.
    Explicit,
    /// No intent was detected; places are offered only when some were found.
    Default,
}

/// Builds the reply for a geocoded destination from whichever lookups ran.
///
/// `place` is the display (title-cased) name. Segments are appended in a fixed
/// order: weather first, then places.
pub fn compose_reply(
    place: &str,
    weather: Option<&WeatherResult>,
    places: Option<(PlacesRequest, &PlacesResult)>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(weather) = weather {
        parts.push(match weather {
            Ok(current) => weather_line(place, current),
            Err(_) => weather_unavailable(place),
        });
    }

    if let Some((request, places)) = places {
        match (request, places) {
            (_, Ok(names)) if !names.is_empty() => {
                if parts.is_empty() {
                    parts.push(places_header(place));
                } else {
                    parts.push(PLACES_HEADER_AFTER_WEATHER.to_string());
                }
                parts.extend(names.iter().map(|name| place_bullet(name)));
            }
            (PlacesRequest::Explicit, _) => parts.push(places_unavailable(place)),
            (PlacesRequest::Default, _) => {}
        }
    }

    if parts.is_empty() {
        nothing_to_say(place)
    } else {
        parts.join("\n")
    }
}

/// Upper-cases the first cased letter of every word and lower-cases the rest.
/// Any character without case (space, digit, apostrophe, hyphen) starts a new word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;

    for ch in text.chars() {
        let cased = ch.is_lowercase() || ch.is_uppercase();
        if cased && previous_cased {
            out.extend(ch.to_lowercase());
        } else if cased {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        previous_cased = cased;
    }

    out
}
