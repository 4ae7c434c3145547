use axum::{extract::State, http::HeaderMap, response::Html};
use std::sync::Arc;
use tracing::debug;

use crate::config::ServerConfig;
use crate::errors::app_error::AppResult;
use crate::routes::paths;
use crate::state::AppState;
use crate::templates::{IndexPage, render_index};
use crate::utils::external_url;

/// Absolute URLs of the webhook and demo routes, as seen from outside.
pub fn index_page(config: &ServerConfig, headers: &HeaderMap) -> IndexPage {
    IndexPage {
        voice_request_url: external_url(config, headers, paths::VOICE),
        sms_request_url: external_url(config, headers, paths::SMS),
        client_url: external_url(config, headers, paths::CLIENT),
    }
}

/// Installation success page
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let page = index_page(&state.config, &headers);
    debug!(voice_request_url = %page.voice_request_url, "Rendering index page");
    Ok(Html(render_index(&page)?))
}
