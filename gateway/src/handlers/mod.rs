//! HTTP request handlers
//!
//! - `webhooks` - TwiML replies to Twilio voice and SMS callbacks
//! - `client` - Twilio Client demo page with a capability token
//! - `index` - Landing page listing the request URLs

pub mod client;
pub mod index;
pub mod webhooks;
