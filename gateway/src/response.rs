//! Adapting handler results into HTTP responses
//!
//! Webhook handlers return a [`HandlerOutput`]. A TwiML document is rendered
//! as `text/xml`; anything else is passed through untouched. axum applies the
//! conversion when the handler's route is registered, so there is no wrapper
//! to apply per handler.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::twiml::{TWIML_CONTENT_TYPE, TwimlResponse};

#[derive(Debug)]
pub enum HandlerOutput {
    /// Structured TwiML, serialized on conversion
    Twiml(TwimlResponse),
    /// A response built by the handler itself
    Raw(Response),
}

impl IntoResponse for HandlerOutput {
    fn into_response(self) -> Response {
        match self {
            HandlerOutput::Twiml(twiml) => (
                StatusCode::OK,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(TWIML_CONTENT_TYPE),
                )],
                twiml.to_string(),
            )
                .into_response(),
            HandlerOutput::Raw(response) => response,
        }
    }
}

impl From<TwimlResponse> for HandlerOutput {
    fn from(twiml: TwimlResponse) -> Self {
        HandlerOutput::Twiml(twiml)
    }
}

impl From<Response> for HandlerOutput {
    fn from(response: Response) -> Self {
        HandlerOutput::Raw(response)
    }
}
