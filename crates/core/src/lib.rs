pub mod error;
pub mod intent;
pub mod models;
pub mod reply;

pub use error::{ConfigError, LookupError};
pub use intent::{analyze_query, extract_place_name, parse_user_intent};
pub use models::*;
pub use reply::{compose_reply, title_case, PlacesRequest};
