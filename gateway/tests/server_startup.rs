//! Server Startup Tests
//!
//! Tests for configuration loading and router construction. The router is
//! driven in-process with `oneshot`, no socket is bound.

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::util::ServiceExt;

use hackpack_gateway::{ServerConfig, config::YamlConfig, routes, state::AppState};

fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_sources(None, |key| vars.get(key).cloned()).unwrap()
}

/// Test that the server can start with no Twilio settings at all
#[tokio::test]
async fn test_minimal_config_boot() {
    let app = routes::create_app_router(AppState::new(config_from(&[])));

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Missing Twilio settings surface on the client page, not as a failure
#[tokio::test]
async fn test_missing_twilio_settings_are_not_fatal() {
    let app = routes::create_app_router(AppState::new(config_from(&[])));

    let request = Request::builder().uri("/client").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test that every route is registered with its method
#[tokio::test]
async fn test_full_routes_available() {
    let app = routes::create_app_router(AppState::new(config_from(&[])));

    for (method, uri) in [
        ("GET", "/"),
        ("GET", "/client"),
        ("POST", "/voice"),
        ("POST", "/sms"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{method} {uri}");
    }
}

/// Routing mismatches are left to the router
#[tokio::test]
async fn test_unknown_path_and_wrong_method() {
    let app = routes::create_app_router(AppState::new(config_from(&[])));

    let request = Request::builder()
        .uri("/missing")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method("GET")
        .uri("/voice")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

/// Development mode follows the listen port
#[test]
fn test_debug_mode_follows_port() {
    let config = config_from(&[]);
    assert_eq!(config.port, 5000);
    assert!(config.debug);

    let config = config_from(&[("PORT", "8080")]);
    assert!(!config.debug);
}

/// Test that the server correctly formats its address
#[test]
fn test_address_parsing() {
    let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "8123")]);
    assert_eq!(config.address(), "127.0.0.1:8123");
    assert!(config.address().parse::<std::net::SocketAddr>().is_ok());
}

/// YAML values override environment values
#[test]
fn test_yaml_overlay() {
    let yaml = YamlConfig::parse(
        r#"
server:
  host: "127.0.0.1"
twilio:
  client_name: "johnny"
security:
  rate_limit_requests_per_second: 100000
"#,
    )
    .unwrap();
    let config =
        ServerConfig::from_sources(Some(yaml), |key| (key == "HOST").then(|| "::1".to_string()))
            .unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.twilio.client_name, "johnny");
    assert_eq!(config.rate_limit_requests_per_second, 100000);
}

fn voice_request(client_ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/voice")
        .header("x-forwarded-for", client_ip)
        .body(Body::empty())
        .unwrap()
}

/// Server-wide layers add the security headers to every response
#[tokio::test]
async fn test_security_headers_present() {
    let app = routes::create_server_router(AppState::new(config_from(&[]))).unwrap();

    for (method, uri) in [("GET", "/"), ("POST", "/voice"), ("GET", "/missing")] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.1")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff",
            "{uri}"
        );
        assert_eq!(
            response.headers().get("x-frame-options").unwrap(),
            "DENY",
            "{uri}"
        );
    }
}

/// Requests beyond the burst from one client are rejected
#[tokio::test]
async fn test_rate_limit_rejects_over_burst() {
    let app = routes::create_server_router(AppState::new(config_from(&[
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST_SIZE", "3"),
    ])))
    .unwrap();

    for _ in 0..3 {
        let response = app.clone().oneshot(voice_request("203.0.113.2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(voice_request("203.0.113.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Other clients keep their own bucket
    let response = app.oneshot(voice_request("203.0.113.3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// The bucket refills at the configured number of requests per second
#[tokio::test]
async fn test_rate_limit_refills_per_second() {
    // Defaults: 60 requests per second, burst of 10
    let app = routes::create_server_router(AppState::new(config_from(&[]))).unwrap();

    for _ in 0..10 {
        let response = app.clone().oneshot(voice_request("203.0.113.4")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(voice_request("203.0.113.4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // At 60/s a token comes back every ~17ms
    tokio::time::sleep(std::time::Duration::from_millis(250)).await;

    let mut accepted = 0;
    for _ in 0..3 {
        let response = app.clone().oneshot(voice_request("203.0.113.4")).await.unwrap();
        if response.status() == StatusCode::OK {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 3);
}

/// Very high rates switch the limiter off entirely
#[tokio::test]
async fn test_rate_limit_disabled_at_threshold() {
    let app = routes::create_server_router(AppState::new(config_from(&[
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "100000"),
        ("RATE_LIMIT_BURST_SIZE", "1"),
    ])))
    .unwrap();

    for _ in 0..50 {
        let request = Request::builder()
            .method("POST")
            .uri("/sms")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
