use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::config::ConfigError;
use crate::state::AppState;

pub mod pages;
pub mod webhooks;

pub mod paths {
    pub const INDEX: &str = "/";
    pub const VOICE: &str = "/voice";
    pub const SMS: &str = "/sms";
    pub const CLIENT: &str = "/client";
}

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Every route of the application with its state attached.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(pages::create_pages_router())
        .merge(webhooks::create_webhook_router())
        .with_state(state)
}

/// Application router wrapped in the server-wide layers: per-IP rate limiting
/// and security headers.
///
/// Clients are keyed by `X-Forwarded-For`/`X-Real-IP`/`Forwarded`, then by the
/// peer address, so the router must be served with connect info.
pub fn create_server_router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let rate_limit_rps = state.config.rate_limit_requests_per_second;
    let rate_limit_burst = state.config.rate_limit_burst_size;

    // One token is refilled every 1/rps seconds
    let governor_layer = if state.config.is_rate_limiting_enabled() {
        let invalid = || ConfigError::InvalidRateLimit {
            requests_per_second: rate_limit_rps,
            burst_size: rate_limit_burst,
        };
        if rate_limit_rps == 0 {
            return Err(invalid());
        }
        let governor_config = GovernorConfigBuilder::default()
            .per_nanosecond((NANOS_PER_SECOND / u64::from(rate_limit_rps)).max(1))
            .burst_size(rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(invalid)?;
        Some(GovernorLayer::new(governor_config))
    } else {
        info!(
            rate = rate_limit_rps,
            "Rate limiting disabled (rate >= 100000/s)"
        );
        None
    };

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    Ok(create_app_router(state)
        .layer(tower::util::option_layer(governor_layer))
        .layer(security_headers))
}
