//! Twilio Client demo page

use axum::{extract::State, response::Html};
use std::sync::Arc;
use tracing::{info, warn};

use crate::capability::Capability;
use crate::config::{TwilioConfig, TwilioSetting};
use crate::errors::app_error::AppResult;
use crate::state::AppState;
use crate::templates::{ClientPage, render_client};

/// Values of every [`TwilioSetting`], in [`TwilioSetting::ALL`] order.
///
/// When settings are missing the error names only the last one checked.
fn required_settings(twilio: &TwilioConfig) -> Result<[&str; 4], String> {
    let mut values = [""; 4];
    let mut configuration_error = None;

    for (slot, setting) in values.iter_mut().zip(TwilioSetting::ALL) {
        match twilio.get(setting) {
            Some(value) => *slot = value,
            None => {
                configuration_error =
                    Some(format!("Missing from configuration: {}", setting.key()));
            }
        }
    }

    match configuration_error {
        Some(error) => Err(error),
        None => Ok(values),
    }
}

/// Build the demo page contents: a fresh capability token, or the
/// configuration error explaining why there is none.
pub fn client_page(twilio: &TwilioConfig) -> AppResult<ClientPage> {
    let [account_sid, auth_token, app_sid, _caller_id] = match required_settings(twilio) {
        Ok(values) => values,
        Err(error) => {
            warn!(error = %error, "Twilio Client demo is not configured");
            return Ok(ClientPage {
                token: None,
                configuration_error: Some(error),
            });
        }
    };

    let mut capability = Capability::new(account_sid, auth_token);
    capability.allow_client_incoming(&twilio.client_name);
    capability.allow_client_outgoing(app_sid);
    let token = capability.generate(twilio.token_ttl_seconds)?;

    info!(
        client_name = %twilio.client_name,
        ttl_seconds = twilio.token_ttl_seconds,
        "Issued capability token"
    );

    Ok(ClientPage {
        token: Some(token),
        configuration_error: None,
    })
}

pub async fn client(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let page = client_page(&state.config.twilio)?;
    Ok(Html(render_client(&page)?))
}
