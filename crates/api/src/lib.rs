mod rate_limit;

use std::any::Any;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Json, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use voyage_agents::{AgentConfig, TourismAgent};
use voyage_observability::{AppMetrics, MetricsSnapshot};

pub use crate::rate_limit::IpRateLimiter;

const MAX_BODY_BYTES: usize = 64 * 1024;
const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";
const GOODBYE_REPLY: &str = "Safe travels! Goodbye!";
const EXIT_WORDS: &[&str] = &["quit", "exit", "bye"];

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<TourismAgent>,
    pub metrics: Arc<AppMetrics>,
    pub limiter: IpRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
    /// Key rate limits on the first `X-Forwarded-For` hop instead of the peer
    /// address. Only safe behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    quit: Option<bool>,
}

impl ChatResponse {
    fn reply(response: impl Into<String>, quit: bool) -> Self {
        Self {
            response: response.into(),
            quit: Some(quit),
        }
    }

    fn internal_error(detail: impl std::fmt::Display) -> Self {
        Self::reply(format!("An error occurred: {detail}"), false)
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
}

pub fn build_app(config: &AgentConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let agent = Arc::new(
        TourismAgent::from_config(config, metrics.clone())
            .context("failed to initialize tourism agent")?,
    );

    let rate_limit_window = Duration::from_secs(
        env::var("VOYAGE_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("VOYAGE_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(60);

    let state = ApiState {
        agent,
        metrics,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
        allowed_origins: Arc::new(parse_allowed_origins(
            env::var("VOYAGE_ALLOWED_ORIGINS").ok().as_deref(),
        )),
        trust_forwarded_for: env::var("VOYAGE_TRUST_FORWARDED_FOR")
            .ok()
            .and_then(|value| value.parse::<bool>().ok())
            .unwrap_or(false),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn chat(
    State(state): State<ApiState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected chat payload");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse::internal_error(rejection.body_text())),
            );
        }
    };

    let message = request.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                response: EMPTY_MESSAGE_REPLY.to_string(),
                quit: None,
            }),
        );
    }

    if is_exit_word(message) {
        return (StatusCode::OK, Json(ChatResponse::reply(GOODBYE_REPLY, true)));
    }

    let reply = state.agent.process_request(message).await;
    (StatusCode::OK, Json(ChatResponse::reply(reply, false)))
}

fn is_exit_word(message: &str) -> bool {
    let lowered = message.to_lowercase();
    EXIT_WORDS.iter().any(|word| *word == lowered)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "internal error".to_string()
    };
    error!(%detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatResponse::internal_error(detail)),
    )
        .into_response()
}

fn parse_allowed_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() {
        layer.allow_origin(AnyOrigin)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || !request.uri().path().starts_with("/api/") {
        return next.run(request).await;
    }

    let ip = client_key(&request, state.trust_forwarded_for);
    if !state.limiter.allow(&ip) {
        warn!(ip = %ip, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({
                "error": "rate_limited",
                "message": "rate limit exceeded for this IP"
            })),
        )
            .into_response();
    }

    next.run(request).await
}

fn client_key(request: &Request<Body>, trust_forwarded_for: bool) -> String {
    let forwarded = trust_forwarded_for
        .then(|| {
            request
                .headers()
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|hop| !hop.is_empty())
        })
        .flatten();

    if let Some(hop) = forwarded {
        return hop.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
