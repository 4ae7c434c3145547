//! TwiML document construction
//!
//! Twilio fetches TwiML from webhook URLs when a call or message arrives and
//! executes the verbs in document order. [`TwimlResponse`] holds that ordered
//! list of verbs and renders the canonical document through [`fmt::Display`]:
//!
//! ```rust
//! use hackpack_gateway::twiml::{Say, TwimlResponse};
//!
//! let mut response = TwimlResponse::new();
//! response.push(Say::new("Hello").voice("alice"));
//! assert_eq!(
//!     response.to_string(),
//!     r#"<?xml version="1.0" encoding="UTF-8"?><Response><Say voice="alice">Hello</Say></Response>"#
//! );
//! ```

use std::fmt;

mod verbs;

pub use verbs::{Message, Pause, Play, Redirect, Reject, RejectReason, Say, Sms, Verb};

/// Media type Twilio expects on TwiML replies.
pub const TWIML_CONTENT_TYPE: &str = "text/xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// An ordered sequence of TwiML verbs wrapped in a `<Response>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwimlResponse {
    verbs: Vec<Verb>,
}

impl TwimlResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a verb.
    pub fn push(&mut self, verb: impl Into<Verb>) -> &mut Self {
        self.verbs.push(verb.into());
        self
    }

    /// Append a `<Say>` with default voice settings.
    pub fn say(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Say::new(text))
    }

    /// Append an `<Sms>` reply to the sender.
    pub fn sms(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Sms::new(text))
    }

    pub fn hangup(&mut self) -> &mut Self {
        self.push(Verb::Hangup)
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}

impl fmt::Display for TwimlResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(XML_DECLARATION)?;
        if self.verbs.is_empty() {
            return f.write_str("<Response />");
        }
        f.write_str("<Response>")?;
        for verb in &self.verbs {
            verb.write_to(f)?;
        }
        f.write_str("</Response>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_empty_response() {
        let response = TwimlResponse::new();
        assert!(response.is_empty());
        assert_eq!(
            response.to_string(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response />"#
        );
    }

    #[test]
    fn test_say() {
        let mut response = TwimlResponse::new();
        response.say("Hello there");
        assert_eq!(
            response.to_string(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Say>Hello there</Say></Response>"#
        );
    }

    #[test]
    fn test_say_attributes_in_fixed_order() {
        let mut response = TwimlResponse::new();
        response.push(Say::new("Hola").loop_count(2).language("es").voice("woman"));
        assert!(response.to_string().contains(
            r#"<Say voice="woman" language="es" loop="2">Hola</Say>"#
        ));
    }

    #[test]
    fn test_sms() {
        let mut response = TwimlResponse::new();
        response.sms("Thanks for writing");
        assert!(
            response
                .to_string()
                .ends_with("<Response><Sms>Thanks for writing</Sms></Response>")
        );
    }

    #[test]
    fn test_sms_with_action() {
        let mut response = TwimlResponse::new();
        response.push(
            Sms::new("hi")
                .to("+15550001111")
                .action("/sms/status", Method::POST),
        );
        assert!(response.to_string().contains(
            r#"<Sms to="+15550001111" action="/sms/status" method="POST">hi</Sms>"#
        ));
    }

    #[test]
    fn test_verbs_kept_in_order() {
        let mut response = TwimlResponse::new();
        response
            .say("one")
            .push(Pause::new(2))
            .push(Play::new("https://example.com/a.mp3"))
            .push(Redirect::new("/next").method(Method::GET))
            .hangup();

        let names: Vec<_> = response.verbs().iter().map(Verb::name).collect();
        assert_eq!(names, vec!["Say", "Pause", "Play", "Redirect", "Hangup"]);
        assert!(response.to_string().contains(
            r#"<Say>one</Say><Pause length="2" /><Play>https://example.com/a.mp3</Play><Redirect method="GET">/next</Redirect><Hangup /></Response>"#
        ));
    }

    #[test]
    fn test_play_digits() {
        let mut response = TwimlResponse::new();
        response.push(Play::digits("wwww3"));
        assert!(response.to_string().contains(r#"<Play digits="wwww3" />"#));
    }

    #[test]
    fn test_reject_reason() {
        let mut response = TwimlResponse::new();
        response.push(Reject {
            reason: Some(RejectReason::Busy),
        });
        assert!(response.to_string().contains(r#"<Reject reason="busy" />"#));
    }

    #[test]
    fn test_message_body_and_attributes_escaped() {
        let mut response = TwimlResponse::new();
        response.push(Message::new("Fish & <chips>").from("\"Shop\""));
        assert!(response.to_string().contains(
            r#"<Message from="&quot;Shop&quot;">Fish &amp; &lt;chips&gt;</Message>"#
        ));
    }
}
