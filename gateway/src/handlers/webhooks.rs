//! Twilio webhook handlers
//!
//! Twilio requests these URLs when a call or text message reaches a number
//! configured with them. Both reply with a fixed TwiML document and ignore the
//! request parameters.

use tracing::info;

use crate::response::HandlerOutput;
use crate::twiml::TwimlResponse;

pub const VOICE_MESSAGE: &str =
    "Congratulations! You deployed the Twilio Hackpack for Heroku and Flask.";
pub const SMS_MESSAGE: &str =
    "Congratulation! You deployed the Twilio Hackpack for Heroku and Flask.";

/// Voice request URL: speak the greeting to the caller.
pub async fn voice() -> HandlerOutput {
    info!("Answering voice webhook");

    let mut response = TwimlResponse::new();
    response.say(VOICE_MESSAGE);
    response.into()
}

/// SMS request URL: text the greeting back to the sender.
pub async fn sms() -> HandlerOutput {
    info!("Answering SMS webhook");

    let mut response = TwimlResponse::new();
    response.sms(SMS_MESSAGE);
    response.into()
}
