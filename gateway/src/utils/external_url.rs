//! Absolute URL construction for links handed to Twilio and browsers
//!
//! Twilio needs fully qualified webhook URLs, so relative paths are resolved
//! against the externally visible origin of the server:
//! - the configured `public_url`, when set
//! - otherwise the scheme from `X-Forwarded-Proto` (falling back to `https`
//!   with TLS, `http` without) and the host from `X-Forwarded-Host` or `Host`
//! - otherwise the listen address

use axum::http::{HeaderMap, header};
use tracing::warn;
use url::Url;

use crate::config::ServerConfig;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HOST: &str = "x-forwarded-host";

/// Origin (and optional base path) that absolute URLs are built from,
/// without a trailing slash.
pub fn external_base_url(config: &ServerConfig, headers: &HeaderMap) -> String {
    if let Some(public_url) = &config.public_url {
        return public_url.trim_end_matches('/').to_string();
    }

    let default_scheme = if config.is_tls_enabled() { "https" } else { "http" };
    let scheme = first_header_value(headers, X_FORWARDED_PROTO)
        .filter(|proto| matches!(*proto, "http" | "https"))
        .unwrap_or(default_scheme);

    let host = first_header_value(headers, X_FORWARDED_HOST)
        .or_else(|| first_header_value(headers, header::HOST.as_str()));

    if let Some(host) = host {
        let candidate = format!("{scheme}://{host}");
        match Url::parse(&candidate) {
            Ok(url)
                if url.host_str().is_some()
                    && url.path() == "/"
                    && url.username().is_empty()
                    && url.password().is_none() =>
            {
                return candidate;
            }
            _ => warn!(host = %host, "Ignoring malformed host header"),
        }
    }

    format!("{scheme}://{}", config.address())
}

/// Absolute URL for `path` on this server.
pub fn external_url(config: &ServerConfig, headers: &HeaderMap, path: &str) -> String {
    format!(
        "{}/{}",
        external_base_url(config, headers),
        path.trim_start_matches('/')
    )
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
