use std::env;
use std::net::SocketAddr;

use anyhow::Result;
use voyage_agents::AgentConfig;
use voyage_api::build_app;
use voyage_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("voyage_api");

    let config = AgentConfig::from_env()?;
    let bind = env::var("VOYAGE_BIND").unwrap_or_else(|_| "0.0.0.0:5000".to_string());

    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(
        bind = %bind,
        geocoder = %config.geocoder.url,
        weather = %config.weather.url,
        places = %config.places.url,
        "voyage concierge api started"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
