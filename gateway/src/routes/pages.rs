//! HTML page route configuration

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::paths;
use crate::handlers::{client, index};
use crate::state::AppState;
use std::sync::Arc;

/// Create the pages router
///
/// # Endpoints
///
/// - `GET /` - Landing page with the voice, SMS and client URLs
/// - `GET /client` - Twilio Client demo with a capability token
pub fn create_pages_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(paths::INDEX, get(index::index))
        .route(paths::CLIENT, get(client::client))
        .layer(TraceLayer::new_for_http())
}
