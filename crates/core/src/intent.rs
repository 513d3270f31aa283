use crate::models::{Intent, QueryAnalysis};

/// Checked in this order; the first pattern present anywhere in the text wins,
/// even when a later pattern occurs earlier in the text.
pub const PLACE_PATTERNS: &[&str] = &[
    "going to go to ",
    "going to ",
    "visit ",
    "to ",
    "in ",
    "plan my trip to ",
    "traveling to ",
    "headed to ",
];

/// A candidate place is cut at the earliest of these.
pub const STOP_MARKERS: &[&str] = &[",", ".", "?", "!", " what", " and", " let", " i "];

pub const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temperature",
    "rain",
    "sunny",
    "climate",
    "hot",
    "cold",
    "forecast",
];

pub const PLACES_KEYWORDS: &[&str] = &[
    "places",
    "visit",
    "attractions",
    "see",
    "tourist",
    "plan",
    "trip",
    "go to",
    "explore",
];

/// Consulted only when no other keyword matched.
pub const PLACES_FALLBACK_KEYWORDS: &[&str] = &["going to", "plan"];

pub fn parse_user_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    let wants_weather = contains_any(&lower, WEATHER_KEYWORDS);
    let mut wants_places = contains_any(&lower, PLACES_KEYWORDS);

    if !wants_weather && !wants_places && contains_any(&lower, PLACES_FALLBACK_KEYWORDS) {
        wants_places = true;
    }

    Intent::new(wants_weather, wants_places)
}

pub fn extract_place_name(text: &str) -> Option<String> {
    let folded = Folded::new(text);

    let (pattern, at) = PLACE_PATTERNS
        .iter()
        .find_map(|pattern| folded.lower.find(pattern).map(|at| (*pattern, at)))?;

    let start = folded.original_offset(at + pattern.len());
    let candidate = truncate_at_stop_marker(text[start..].trim()).trim();

    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

pub fn analyze_query(text: &str) -> QueryAnalysis {
    QueryAnalysis {
        place: extract_place_name(text),
        intent: parse_user_intent(text),
    }
}

fn truncate_at_stop_marker(candidate: &str) -> &str {
    let folded = Folded::new(candidate);

    match STOP_MARKERS
        .iter()
        .filter_map(|marker| folded.lower.find(marker))
        .min()
    {
        Some(at) => &candidate[..folded.original_offset(at)],
        None => candidate,
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}

/// Lowercased copy of a string that remembers, for every byte of the
/// lowercased text, where the producing character starts in the original.
struct Folded {
    lower: String,
    origin: Vec<usize>,
}

impl Folded {
    fn new(original: &str) -> Self {
        let mut lower = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len() + 1);

        for (idx, ch) in original.char_indices() {
            for folded in ch.to_lowercase() {
                let before = lower.len();
                lower.push(folded);
                origin.resize(origin.len() + (lower.len() - before), idx);
            }
        }
        origin.push(original.len());

        Self { lower, origin }
    }

    fn original_offset(&self, lower_offset: usize) -> usize {
        self.origin[lower_offset]
    }
}
