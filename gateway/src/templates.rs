//! HTML pages served by the gateway
//!
//! Pages are rendered with `write!` into a `String`. Every interpolated value
//! goes through [`escape_markup`].

use std::fmt::{self, Write};

use crate::utils::escape_markup;

const TWILIO_JS_URL: &str = "https://static.twilio.com/libs/twiliojs/1.2/twilio.min.js";

/// Values shown on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub voice_request_url: String,
    pub sms_request_url: String,
    pub client_url: String,
}

/// Values shown on the client demo page. Exactly one of `token` and
/// `configuration_error` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPage {
    pub token: Option<String>,
    pub configuration_error: Option<String>,
}

fn write_head(out: &mut String, title: &str) -> fmt::Result {
    write!(
        out,
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; max-width: 760px; margin: 40px auto; padding: 0 20px; color: #222; }}
        h1 {{ color: #f22f46; }}
        code {{ background: #f4f4f4; padding: 2px 6px; border-radius: 4px; }}
        .error {{ background: #fdecea; border: 1px solid #f5c2c0; padding: 12px 16px; border-radius: 6px; }}
        button {{ font-size: 1em; padding: 6px 16px; margin-right: 8px; }}
    </style>
"#,
        escape_markup(title)
    )
}

pub fn render_index(page: &IndexPage) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_head(&mut out, "Twilio Hackpack")?;
    write!(
        out,
        r#"</head>
<body>
    <h1>You deployed the Twilio Hackpack!</h1>
    <p>Configure your Twilio phone number and TwiML app with these request URLs:</p>
    <dl>
        <dt>Voice Request URL</dt>
        <dd><code id="voice-request-url">{voice}</code></dd>
        <dt>SMS Request URL</dt>
        <dd><code id="sms-request-url">{sms}</code></dd>
    </dl>
    <p>Then try the <a id="client-url" href="{client}">Twilio Client demo</a>.</p>
</body>
</html>
"#,
        voice = escape_markup(&page.voice_request_url),
        sms = escape_markup(&page.sms_request_url),
        client = escape_markup(&page.client_url),
    )?;
    Ok(out)
}

pub fn render_client(page: &ClientPage) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_head(&mut out, "Twilio Client Demo")?;

    match (&page.token, &page.configuration_error) {
        (Some(token), _) => {
            writeln!(out, r#"    <script src="{TWILIO_JS_URL}"></script>"#)?;
            write!(
                out,
                r#"</head>
<body>
    <h1>Twilio Client</h1>
    <div id="client" data-token="{token}">
        <button id="call">Call</button>
        <button id="hangup">Hang up</button>
        <p id="status">Loading...</p>
    </div>
    <script>
        var token = document.getElementById("client").dataset.token;
        var status = document.getElementById("status");
        Twilio.Device.setup(token);
        Twilio.Device.ready(function () {{ status.textContent = "Ready"; }});
        Twilio.Device.error(function (error) {{ status.textContent = "Error: " + error.message; }});
        Twilio.Device.connect(function () {{ status.textContent = "Connected"; }});
        Twilio.Device.disconnect(function () {{ status.textContent = "Call ended"; }});
        Twilio.Device.incoming(function (conn) {{
            status.textContent = "Incoming call from " + conn.parameters.From;
            conn.accept();
        }});
        document.getElementById("call").onclick = function () {{ Twilio.Device.connect(); }};
        document.getElementById("hangup").onclick = function () {{ Twilio.Device.disconnectAll(); }};
    </script>
</body>
</html>
"#,
                token = escape_markup(token),
            )?;
        }
        (None, error) => {
            write!(
                out,
                r#"</head>
<body>
    <h1>Twilio Client</h1>
    <p class="error" id="configuration-error">{}</p>
</body>
</html>
"#,
                escape_markup(error.as_deref().unwrap_or("Twilio Client is not configured."))
            )?;
        }
    }

    Ok(out)
}
