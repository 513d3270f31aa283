use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use voyage_agents::{AgentConfig, TourismAgent};
use voyage_api::{build_app, build_router, ApiState, IpRateLimiter};
use voyage_observability::AppMetrics;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn upstreams() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": "35.6768601", "lon": "139.7638947", "display_name": "Tokyo, Japan" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current": { "temperature_2m": 22.0, "precipitation_probability": 10 }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                { "type": "node", "id": 1, "tags": { "name": "Senso-ji" } },
                { "type": "node", "id": 2, "tags": { "name": "Meiji Jingu" } },
                { "type": "node", "id": 3, "tags": { "name": "Senso-ji" } }
            ]
        })))
        .mount(&server)
        .await;

    server
}

fn app_for(server: &MockServer) -> Router {
    build_app(&AgentConfig::with_base_url(&server.uri())).expect("app should build")
}

fn chat_request(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(body)
        .unwrap()
}

fn chat_message(message: &str) -> Request<Body> {
    chat_request(Body::from(json!({ "message": message }).to_string()))
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_metrics() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = json_body(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["metrics"]["requests_total"], 0);
    assert!(parsed["timestamp_utc"].is_string());
}

#[tokio::test]
async fn weather_question_end_to_end() {
    let server = upstreams().await;
    let app = app_for(&server);

    let response = app
        .oneshot(chat_message("I'm going to Tokyo, what's the weather like?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = json_body(response).await;
    assert_eq!(
        parsed["response"],
        "In Tokyo it's currently 22°C with a 10% chance of rain."
    );
    assert_eq!(parsed["quit"], false);
}

#[tokio::test]
async fn weather_and_places_end_to_end() {
    let server = upstreams().await;
    let app = app_for(&server);

    let response = app
        .oneshot(chat_message(
            "going to Tokyo, what's the weather and places to see?",
        ))
        .await
        .unwrap();

    let parsed = json_body(response).await;
    assert_eq!(
        parsed["response"],
        "In Tokyo it's currently 22°C with a 10% chance of rain.\nAnd these are the places you can go:\n  • Senso-ji\n  • Meiji Jingu"
    );
}

#[tokio::test]
async fn unknown_place_names_raw_text() {
    let server = upstreams().await;
    let app = app_for(&server);

    let response = app
        .oneshot(chat_message("visit Atlantis, is it sunny?"))
        .await
        .unwrap();

    let parsed = json_body(response).await;
    assert_eq!(
        parsed["response"],
        "I'm sorry, I don't know if 'Atlantis' exists or I couldn't find it. Could you check the spelling or try a different place?"
    );
}

#[tokio::test]
async fn missing_destination_asks_for_one_without_upstream_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .oneshot(chat_message("what's the weather like?"))
        .await
        .unwrap();

    let parsed = json_body(response).await;
    assert_eq!(
        parsed["response"],
        "I couldn't figure out which place you want to visit. Could you please mention the destination?"
    );
}

#[tokio::test]
async fn empty_message_is_bad_request() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app.oneshot(chat_message("   ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let parsed = json_body(response).await;
    assert_eq!(parsed, json!({ "response": "Please enter a message." }));
}

#[tokio::test]
async fn missing_message_field_is_bad_request() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .oneshot(chat_request(Body::from("{}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exit_word_says_goodbye() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app.oneshot(chat_message(" Bye ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed = json_body(response).await;
    assert_eq!(
        parsed,
        json!({ "response": "Safe travels! Goodbye!", "quit": true })
    );
}

#[tokio::test]
async fn malformed_json_is_internal_error() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .oneshot(chat_request(Body::from("{not json")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let parsed = json_body(response).await;
    assert!(parsed["response"]
        .as_str()
        .unwrap()
        .starts_with("An error occurred: "));
    assert_eq!(parsed["quit"], false);
}

fn limited_app(server: &MockServer, max_requests: usize, trust_forwarded_for: bool) -> Router {
    let metrics = AppMetrics::shared();
    let agent = TourismAgent::from_config(&AgentConfig::with_base_url(&server.uri()), metrics.clone())
        .expect("agent should build");
    build_router(ApiState {
        agent: Arc::new(agent),
        metrics,
        limiter: IpRateLimiter::new(Duration::from_secs(60), max_requests),
        allowed_origins: Arc::new(Vec::new()),
        trust_forwarded_for,
    })
}

fn chat_from(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut request = chat_message("quit");
    let addr: SocketAddr = peer.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    if let Some(value) = forwarded_for {
        request
            .headers_mut()
            .insert("x-forwarded-for", value.parse().unwrap());
    }
    request
}

#[tokio::test]
async fn chat_is_rate_limited_per_ip() {
    let server = MockServer::start().await;
    let app = limited_app(&server, 1, false);

    let first = app.clone().oneshot(chat_from("198.51.100.2:40000", None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.clone().oneshot(chat_from("198.51.100.2:40001", None)).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

    let health = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn direct_clients_get_separate_buckets() {
    let server = MockServer::start().await;
    let app = limited_app(&server, 2, false);

    for _ in 0..2 {
        let response = app.clone().oneshot(chat_from("198.51.100.2:40000", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let exhausted = app.clone().oneshot(chat_from("198.51.100.2:40000", None)).await.unwrap();
    assert_eq!(exhausted.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app.oneshot(chat_from("203.0.113.9:51000", None)).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn forged_forwarded_header_does_not_bypass_limit() {
    let server = MockServer::start().await;
    let app = limited_app(&server, 1, false);

    let first = app.clone().oneshot(chat_from("198.51.100.2:40000", None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let forged = app
        .oneshot(chat_from("198.51.100.2:40000", Some("1.2.3.4")))
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn trusted_proxy_limits_by_forwarded_client() {
    let server = MockServer::start().await;
    let app = limited_app(&server, 1, true);

    let alice = app
        .clone()
        .oneshot(chat_from("10.0.0.1:443", Some("203.0.113.7")))
        .await
        .unwrap();
    assert_eq!(alice.status(), StatusCode::OK);

    let bob = app
        .clone()
        .oneshot(chat_from("10.0.0.1:443", Some("198.51.100.20")))
        .await
        .unwrap();
    assert_eq!(bob.status(), StatusCode::OK);

    let alice_again = app
        .oneshot(chat_from("10.0.0.1:443", Some("203.0.113.7")))
        .await
        .unwrap();
    assert_eq!(alice_again.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
