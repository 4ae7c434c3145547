//! Configuration module for the hackpack gateway
//!
//! Configuration comes from `.env` files, environment variables and an
//! optional YAML file. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `env`: Environment variable loading
//! - `yaml`: YAML configuration file loading
//!
//! Missing Twilio credentials are not a startup error. The client demo page
//! reports them when it is requested.
//!
//! # Example
//! ```rust,no_run
//! use hackpack_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::capability::{DEFAULT_TOKEN_TTL_SECONDS, MAX_TOKEN_TTL_SECONDS};

mod env;
mod yaml;

use env::EnvConfig;
pub use yaml::YamlConfig;

/// Port used when neither `PORT` nor the YAML file sets one.
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Client identity granted incoming calls on the demo page.
pub const DEFAULT_CLIENT_NAME: &str = "joey_ramone";
pub const DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND: u32 = 60;
pub const DEFAULT_RATE_LIMIT_BURST_SIZE: u32 = 10;
/// Rates at or above this value turn per-IP rate limiting off.
pub const RATE_LIMIT_DISABLED_THRESHOLD: u32 = 100_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid public URL '{url}': {reason}")]
    InvalidPublicUrl { url: String, reason: String },

    #[error("TLS requires both a certificate path and a key path")]
    IncompleteTls,

    #[error(
        "Invalid rate limit: {requests_per_second} requests per second with burst size {burst_size}"
    )]
    InvalidRateLimit {
        requests_per_second: u32,
        burst_size: u32,
    },
}

/// TLS configuration for HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Settings the client demo page requires, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwilioSetting {
    AccountSid,
    AuthToken,
    AppSid,
    CallerId,
}

impl TwilioSetting {
    pub const ALL: [TwilioSetting; 4] = [
        TwilioSetting::AccountSid,
        TwilioSetting::AuthToken,
        TwilioSetting::AppSid,
        TwilioSetting::CallerId,
    ];

    /// Name of the setting as it appears in the environment.
    pub fn key(&self) -> &'static str {
        match self {
            TwilioSetting::AccountSid => env::TWILIO_ACCOUNT_SID,
            TwilioSetting::AuthToken => env::TWILIO_AUTH_TOKEN,
            TwilioSetting::AppSid => env::TWILIO_APP_SID,
            TwilioSetting::CallerId => env::TWILIO_CALLER_ID,
        }
    }
}

/// Twilio account settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// TwiML application placing outgoing client calls
    pub app_sid: Option<String>,
    /// Phone number outgoing calls are placed from
    pub caller_id: Option<String>,
    /// Identity that receives incoming client calls
    pub client_name: String,
    pub token_ttl_seconds: u64,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            app_sid: None,
            caller_id: None,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

impl TwilioConfig {
    /// Value of a required setting, or `None` when it is unset or empty.
    pub fn get(&self, setting: TwilioSetting) -> Option<&str> {
        let value = match setting {
            TwilioSetting::AccountSid => &self.account_sid,
            TwilioSetting::AuthToken => &self.auth_token,
            TwilioSetting::AppSid => &self.app_sid,
            TwilioSetting::CallerId => &self.caller_id,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    /// Verbose logging for local development. Enabled by default when the
    /// server runs on [`DEFAULT_PORT`].
    pub debug: bool,
    /// Externally visible base URL, used instead of the request's Host header
    /// when building absolute links.
    pub public_url: Option<String>,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    pub twilio: TwilioConfig,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: true,
            public_url: None,
            tls: None,
            twilio: TwilioConfig::default(),
            rate_limit_requests_per_second: DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND,
            rate_limit_burst_size: DEFAULT_RATE_LIMIT_BURST_SIZE,
        }
    }
}

/// Zeroize the auth token when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.twilio.auth_token {
            token.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// `.env` is loaded into the environment by `main` before this is called.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(None, |key| std::env::var(key).ok())
    }

    /// Load configuration from a YAML file with environment variable base.
    ///
    /// Values in the file override the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = YamlConfig::from_file(path)?;
        Self::from_sources(Some(yaml), |key| std::env::var(key).ok())
    }

    /// Merge an optional YAML overlay onto variables obtained from `lookup`.
    pub fn from_sources<F>(yaml: Option<YamlConfig>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvConfig::load(lookup)?;
        let yaml = yaml.unwrap_or_default();
        let server = yaml.server.unwrap_or_default();
        let twilio = yaml.twilio.unwrap_or_default();
        let security = yaml.security.unwrap_or_default();
        let tls_yaml = server.tls.unwrap_or_default();

        let port = server.port.or(env.port).unwrap_or(DEFAULT_PORT);
        let debug = server
            .debug
            .or(env.debug)
            .unwrap_or(port == DEFAULT_PORT);

        let public_url = server.public_url.or(env.public_url);
        if let Some(ref url) = public_url {
            validate_public_url(url)?;
        }

        let tls = match (
            tls_yaml.cert_path.or(env.tls_cert_path),
            tls_yaml.key_path.or(env.tls_key_path),
        ) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert_path),
                key_path: PathBuf::from(key_path),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let token_ttl_seconds = twilio
            .token_ttl_seconds
            .or(env.token_ttl_seconds)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&token_ttl_seconds) {
            return Err(ConfigError::InvalidValue {
                key: env::CAPABILITY_TOKEN_TTL_SECONDS,
                value: token_ttl_seconds.to_string(),
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_SECONDS} seconds"),
            });
        }

        let rate_limit_requests_per_second = security
            .rate_limit_requests_per_second
            .or(env.rate_limit_requests_per_second)
            .unwrap_or(DEFAULT_RATE_LIMIT_REQUESTS_PER_SECOND);
        let rate_limit_burst_size = security
            .rate_limit_burst_size
            .or(env.rate_limit_burst_size)
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST_SIZE);
        if rate_limit_requests_per_second == 0 || rate_limit_burst_size == 0 {
            return Err(ConfigError::InvalidRateLimit {
                requests_per_second: rate_limit_requests_per_second,
                burst_size: rate_limit_burst_size,
            });
        }

        Ok(Self {
            host: server.host.or(env.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            debug,
            public_url,
            tls,
            twilio: TwilioConfig {
                account_sid: twilio.account_sid.or(env.account_sid),
                auth_token: twilio.auth_token.or(env.auth_token),
                app_sid: twilio.app_sid.or(env.app_sid),
                caller_id: twilio.caller_id.or(env.caller_id),
                client_name: twilio
                    .client_name
                    .or(env.client_name)
                    .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
                token_ttl_seconds,
            },
            rate_limit_requests_per_second,
            rate_limit_burst_size,
        })
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Per-IP rate limiting is skipped for very high configured rates.
    pub fn is_rate_limiting_enabled(&self) -> bool {
        self.rate_limit_requests_per_second < RATE_LIMIT_DISABLED_THRESHOLD
    }
}

fn validate_public_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidPublicUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_sources(None, lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.debug);
        assert!(config.public_url.is_none());
        assert!(!config.is_tls_enabled());
        assert_eq!(config.twilio.client_name, "joey_ramone");
        assert_eq!(config.twilio.token_ttl_seconds, 3600);
        assert_eq!(config.rate_limit_requests_per_second, 60);
        assert_eq!(config.rate_limit_burst_size, 10);
        assert_eq!(config.address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_port_set_disables_debug() {
        let config = ServerConfig::from_sources(None, lookup(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
    }

    #[test]
    fn test_debug_override() {
        let config =
            ServerConfig::from_sources(None, lookup(&[("PORT", "8080"), ("DEBUG", "true")]))
                .unwrap();
        assert!(config.debug);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = ServerConfig::from_sources(None, lookup(&[("PORT", "abc")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_yaml_overrides_env() {
        let yaml = YamlConfig::parse(
            r#"
server:
  port: 9000
twilio:
  account_sid: "AC-yaml"
"#,
        )
        .unwrap();
        let config = ServerConfig::from_sources(
            Some(yaml),
            lookup(&[
                ("PORT", "8080"),
                ("TWILIO_ACCOUNT_SID", "AC-env"),
                ("TWILIO_AUTH_TOKEN", "token-env"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.twilio.account_sid.as_deref(), Some("AC-yaml"));
        assert_eq!(config.twilio.auth_token.as_deref(), Some("token-env"));
    }

    #[test]
    fn test_incomplete_tls_rejected() {
        let result =
            ServerConfig::from_sources(None, lookup(&[("TLS_CERT_PATH", "/tmp/cert.pem")]));
        assert!(matches!(result, Err(ConfigError::IncompleteTls)));
    }

    #[test]
    fn test_tls_paths() {
        let config = ServerConfig::from_sources(
            None,
            lookup(&[
                ("TLS_CERT_PATH", "/tmp/cert.pem"),
                ("TLS_KEY_PATH", "/tmp/key.pem"),
            ]),
        )
        .unwrap();
        let tls = config.tls.as_ref().unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("/tmp/cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("/tmp/key.pem"));
    }

    #[test]
    fn test_public_url_validation() {
        let ok = ServerConfig::from_sources(
            None,
            lookup(&[("PUBLIC_URL", "https://hackpack.example.com")]),
        )
        .unwrap();
        assert_eq!(
            ok.public_url.as_deref(),
            Some("https://hackpack.example.com")
        );

        let bad_scheme =
            ServerConfig::from_sources(None, lookup(&[("PUBLIC_URL", "ftp://example.com")]));
        assert!(matches!(
            bad_scheme,
            Err(ConfigError::InvalidPublicUrl { .. })
        ));

        let not_a_url = ServerConfig::from_sources(None, lookup(&[("PUBLIC_URL", "example")]));
        assert!(not_a_url.is_err());
    }

    #[test]
    fn test_token_ttl_range() {
        for value in ["0", "86401", "18446744073709551615"] {
            let result = ServerConfig::from_sources(
                None,
                lookup(&[("CAPABILITY_TOKEN_TTL_SECONDS", value)]),
            );
            assert!(
                matches!(
                    result,
                    Err(ConfigError::InvalidValue {
                        key: "CAPABILITY_TOKEN_TTL_SECONDS",
                        ..
                    })
                ),
                "{value}"
            );
        }

        let config = ServerConfig::from_sources(
            None,
            lookup(&[("CAPABILITY_TOKEN_TTL_SECONDS", "86400")]),
        )
        .unwrap();
        assert_eq!(config.twilio.token_ttl_seconds, MAX_TOKEN_TTL_SECONDS);

        let yaml = YamlConfig::parse("twilio:\n  token_ttl_seconds: 0\n").unwrap();
        assert!(ServerConfig::from_sources(Some(yaml), lookup(&[])).is_err());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let result = ServerConfig::from_sources(
            None,
            lookup(&[("RATE_LIMIT_REQUESTS_PER_SECOND", "0")]),
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRateLimit {
                requests_per_second: 0,
                burst_size: 10
            })
        ));

        let result = ServerConfig::from_sources(None, lookup(&[("RATE_LIMIT_BURST_SIZE", "0")]));
        assert!(matches!(result, Err(ConfigError::InvalidRateLimit { .. })));
    }

    #[test]
    fn test_rate_limiting_threshold() {
        let config = ServerConfig::from_sources(None, lookup(&[])).unwrap();
        assert!(config.is_rate_limiting_enabled());

        let config = ServerConfig::from_sources(
            None,
            lookup(&[("RATE_LIMIT_REQUESTS_PER_SECOND", "100000")]),
        )
        .unwrap();
        assert!(!config.is_rate_limiting_enabled());
    }

    #[test]
    fn test_twilio_setting_lookup_ignores_empty() {
        let twilio = TwilioConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(twilio.get(TwilioSetting::AccountSid), Some("AC123"));
        assert_eq!(twilio.get(TwilioSetting::AuthToken), None);
        assert_eq!(twilio.get(TwilioSetting::AppSid), None);
        assert_eq!(TwilioSetting::CallerId.key(), "TWILIO_CALLER_ID");
    }
}
