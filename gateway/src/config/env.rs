use std::str::FromStr;

use super::ConfigError;

pub(crate) const HOST: &str = "HOST";
pub(crate) const PORT: &str = "PORT";
pub(crate) const DEBUG: &str = "DEBUG";
pub(crate) const PUBLIC_URL: &str = "PUBLIC_URL";
pub(crate) const TLS_CERT_PATH: &str = "TLS_CERT_PATH";
pub(crate) const TLS_KEY_PATH: &str = "TLS_KEY_PATH";
pub(crate) const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub(crate) const TWILIO_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub(crate) const TWILIO_APP_SID: &str = "TWILIO_APP_SID";
pub(crate) const TWILIO_CALLER_ID: &str = "TWILIO_CALLER_ID";
pub(crate) const TWILIO_CLIENT_NAME: &str = "TWILIO_CLIENT_NAME";
pub(crate) const CAPABILITY_TOKEN_TTL_SECONDS: &str = "CAPABILITY_TOKEN_TTL_SECONDS";
pub(crate) const RATE_LIMIT_REQUESTS_PER_SECOND: &str = "RATE_LIMIT_REQUESTS_PER_SECOND";
pub(crate) const RATE_LIMIT_BURST_SIZE: &str = "RATE_LIMIT_BURST_SIZE";

/// Raw settings read from the environment, before defaults are applied.
///
/// Empty and whitespace-only values count as unset.
#[derive(Debug, Default)]
pub(crate) struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub public_url: Option<String>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub app_sid: Option<String>,
    pub caller_id: Option<String>,
    pub client_name: Option<String>,
    pub token_ttl_seconds: Option<u64>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl EnvConfig {
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            host: get(HOST),
            port: parse_var(PORT, get(PORT))?,
            debug: get(DEBUG).map(|v| parse_bool(DEBUG, &v)).transpose()?,
            public_url: get(PUBLIC_URL),
            tls_cert_path: get(TLS_CERT_PATH),
            tls_key_path: get(TLS_KEY_PATH),
            account_sid: get(TWILIO_ACCOUNT_SID),
            auth_token: get(TWILIO_AUTH_TOKEN),
            app_sid: get(TWILIO_APP_SID),
            caller_id: get(TWILIO_CALLER_ID),
            client_name: get(TWILIO_CLIENT_NAME),
            token_ttl_seconds: parse_var(
                CAPABILITY_TOKEN_TTL_SECONDS,
                get(CAPABILITY_TOKEN_TTL_SECONDS),
            )?,
            rate_limit_requests_per_second: parse_var(
                RATE_LIMIT_REQUESTS_PER_SECOND,
                get(RATE_LIMIT_REQUESTS_PER_SECOND),
            )?,
            rate_limit_burst_size: parse_var(RATE_LIMIT_BURST_SIZE, get(RATE_LIMIT_BURST_SIZE))?,
        })
    }
}

fn parse_var<T>(key: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                key,
                value: v.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
