//! Twilio webhook route configuration

use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use super::paths;
use crate::handlers::webhooks;
use crate::state::AppState;
use std::sync::Arc;

/// Create the webhook router
///
/// # Endpoints
///
/// - `POST /voice` - Voice request URL, replies with `<Say>`
/// - `POST /sms` - SMS request URL, replies with `<Sms>`
///
/// Both reply with `Content-Type: text/xml`.
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(paths::VOICE, post(webhooks::voice))
        .route(paths::SMS, post(webhooks::sms))
        .layer(TraceLayer::new_for_http())
}
