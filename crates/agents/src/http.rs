use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use voyage_core::LookupError;

/// Shared client for all lookups; per-request timeouts are set by each service.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(6))
        .build()
        .context("failed to build HTTP client")
}

pub(crate) fn transport_error(error: reqwest::Error) -> LookupError {
    if error.is_timeout() {
        LookupError::transport(format!("timed out: {error}"))
    } else {
        LookupError::transport(error.to_string())
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, LookupError> {
    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Status(status.as_u16()));
    }

    let body = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&body).map_err(|error| LookupError::decode(error.to_string()))
}
