use std::fmt::{self, Write};

use http::Method;

use crate::utils::escape_markup;

/// A single TwiML instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(Say),
    Play(Play),
    Pause(Pause),
    Sms(Sms),
    Message(Message),
    Redirect(Redirect),
    Hangup,
    Reject(Reject),
}

impl Verb {
    /// Element name as it appears in the serialized document.
    pub fn name(&self) -> &'static str {
        match self {
            Verb::Say(_) => "Say",
            Verb::Play(_) => "Play",
            Verb::Pause(_) => "Pause",
            Verb::Sms(_) => "Sms",
            Verb::Message(_) => "Message",
            Verb::Redirect(_) => "Redirect",
            Verb::Hangup => "Hangup",
            Verb::Reject(_) => "Reject",
        }
    }

    pub(crate) fn write_to(&self, out: &mut impl Write) -> fmt::Result {
        let name = self.name();
        match self {
            Verb::Say(say) => write_element(
                out,
                name,
                &[
                    ("voice", say.voice.clone()),
                    ("language", say.language.clone()),
                    ("loop", say.loop_count.map(|n| n.to_string())),
                ],
                Some(&say.text),
            ),
            Verb::Play(play) => write_element(
                out,
                name,
                &[
                    ("loop", play.loop_count.map(|n| n.to_string())),
                    ("digits", play.digits.clone()),
                ],
                play.url.as_deref(),
            ),
            Verb::Pause(pause) => write_element(
                out,
                name,
                &[("length", pause.length.map(|n| n.to_string()))],
                None,
            ),
            Verb::Sms(sms) => write_element(
                out,
                name,
                &[
                    ("to", sms.to.clone()),
                    ("from", sms.from.clone()),
                    ("action", sms.action.clone()),
                    ("method", method_attr(&sms.method)),
                    ("statusCallback", sms.status_callback.clone()),
                ],
                Some(&sms.text),
            ),
            Verb::Message(message) => write_element(
                out,
                name,
                &[
                    ("to", message.to.clone()),
                    ("from", message.from.clone()),
                    ("action", message.action.clone()),
                    ("method", method_attr(&message.method)),
                ],
                Some(&message.body),
            ),
            Verb::Redirect(redirect) => write_element(
                out,
                name,
                &[("method", method_attr(&redirect.method))],
                Some(&redirect.url),
            ),
            Verb::Hangup => write_element(out, name, &[], None),
            Verb::Reject(reject) => write_element(
                out,
                name,
                &[("reason", reject.reason.map(|r| r.as_str().to_string()))],
                None,
            ),
        }
    }
}

fn method_attr(method: &Option<Method>) -> Option<String> {
    method.as_ref().map(|m| m.as_str().to_string())
}

fn write_element(
    out: &mut impl Write,
    name: &str,
    attributes: &[(&str, Option<String>)],
    body: Option<&str>,
) -> fmt::Result {
    write!(out, "<{name}")?;
    for (key, value) in attributes {
        if let Some(value) = value {
            write!(out, " {key}=\"{}\"", escape_markup(value))?;
        }
    }
    match body {
        Some(body) => write!(out, ">{}</{name}>", escape_markup(body)),
        None => write!(out, " />"),
    }
}

/// `<Say>`: read text to the caller with text-to-speech.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Say {
    pub text: String,
    pub voice: Option<String>,
    pub language: Option<String>,
    pub loop_count: Option<u32>,
}

impl Say {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn loop_count(mut self, count: u32) -> Self {
        self.loop_count = Some(count);
        self
    }
}

/// `<Play>`: play an audio file, or send DTMF digits when `digits` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Play {
    pub url: Option<String>,
    pub loop_count: Option<u32>,
    pub digits: Option<String>,
}

impl Play {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn digits(digits: impl Into<String>) -> Self {
        Self {
            digits: Some(digits.into()),
            ..Default::default()
        }
    }

    pub fn loop_count(mut self, count: u32) -> Self {
        self.loop_count = Some(count);
        self
    }
}

/// `<Pause>`: wait silently for `length` seconds (Twilio defaults to 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pause {
    pub length: Option<u32>,
}

impl Pause {
    pub fn new(length: u32) -> Self {
        Self {
            length: Some(length),
        }
    }
}

/// `<Sms>`: legacy verb that replies to the sender with a text message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sms {
    pub text: String,
    pub to: Option<String>,
    pub from: Option<String>,
    pub action: Option<String>,
    pub method: Option<Method>,
    pub status_callback: Option<String>,
}

impl Sms {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>, method: Method) -> Self {
        self.action = Some(action.into());
        self.method = Some(method);
        self
    }

    pub fn status_callback(mut self, url: impl Into<String>) -> Self {
        self.status_callback = Some(url.into());
        self
    }
}

/// `<Message>`: the messaging verb that superseded `<Sms>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub body: String,
    pub to: Option<String>,
    pub from: Option<String>,
    pub action: Option<String>,
    pub method: Option<Method>,
}

impl Message {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>, method: Method) -> Self {
        self.action = Some(action.into());
        self.method = Some(method);
        self
    }
}

/// `<Redirect>`: hand control of the call to another TwiML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
    pub method: Option<Method>,
}

impl Redirect {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }
}

/// `<Reject>`: refuse an incoming call without billing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reject {
    pub reason: Option<RejectReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Rejected,
    Busy,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Rejected => "rejected",
            RejectReason::Busy => "busy",
        }
    }
}

impl From<Say> for Verb {
    fn from(say: Say) -> Self {
        Verb::Say(say)
    }
}

impl From<Play> for Verb {
    fn from(play: Play) -> Self {
        Verb::Play(play)
    }
}

impl From<Pause> for Verb {
    fn from(pause: Pause) -> Self {
        Verb::Pause(pause)
    }
}

impl From<Sms> for Verb {
    fn from(sms: Sms) -> Self {
        Verb::Sms(sms)
    }
}

impl From<Message> for Verb {
    fn from(message: Message) -> Self {
        Verb::Message(message)
    }
}

impl From<Redirect> for Verb {
    fn from(redirect: Redirect) -> Self {
        Verb::Redirect(redirect)
    }
}

impl From<Reject> for Verb {
    fn from(reject: Reject) -> Self {
        Verb::Reject(reject)
    }
}
