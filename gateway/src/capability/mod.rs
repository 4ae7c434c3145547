//! Twilio Client capability tokens
//!
//! A capability token is an HS256 JWT signed with the account auth token. Its
//! `scope` claim lists the permissions granted to the browser client as
//! space-separated [`ScopeUri`]s:
//!
//! - `scope:client:incoming?clientName=<name>` lets the client receive calls
//!   addressed to `client:<name>`
//! - `scope:client:outgoing?appSid=<sid>` lets the client place calls that are
//!   routed through the TwiML application `<sid>`
//!
//! ```rust
//! use hackpack_gateway::capability::Capability;
//!
//! let mut capability = Capability::new("AC123", "secret");
//! capability.allow_client_incoming("alice");
//! capability.allow_client_outgoing("AP456");
//! let token = capability.generate(3600).unwrap();
//! assert_eq!(token.split('.').count(), 3);
//! ```

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

mod scope;

pub use scope::ScopeUri;

/// Lifetime of a generated token when none is configured.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
/// Longest lifetime Twilio Client accepts for a capability token.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 86_400;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Failed to sign capability token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid capability token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),

    #[error("Token lifetime of {0} seconds is out of range")]
    TtlOutOfRange(u64),
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Claims carried by a capability token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityClaims {
    pub scope: String,
    pub iss: String,
    pub exp: i64,
}

impl CapabilityClaims {
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split(' ').filter(|s| !s.is_empty())
    }
}

/// Builder for a set of Twilio Client permissions signed by one account.
pub struct Capability {
    account_sid: String,
    auth_token: String,
    client_name: Option<String>,
    incoming: Option<ScopeUri>,
    outgoing: Option<ScopeUri>,
}

impl Drop for Capability {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.auth_token.zeroize();
    }
}

impl Capability {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            client_name: None,
            incoming: None,
            outgoing: None,
        }
    }

    /// Allow the client to receive calls addressed to `client_name`.
    ///
    /// The name is also attached to the outgoing grant, so calls placed by the
    /// client carry its identity.
    pub fn allow_client_incoming(&mut self, client_name: impl Into<String>) -> &mut Self {
        let client_name = client_name.into();
        self.incoming =
            Some(ScopeUri::new("client", "incoming").with_param("clientName", &client_name));
        self.client_name = Some(client_name);
        self
    }

    /// Allow the client to place calls through the TwiML application `app_sid`.
    pub fn allow_client_outgoing(&mut self, app_sid: impl Into<String>) -> &mut Self {
        self.allow_client_outgoing_with_params(app_sid, std::iter::empty::<(String, String)>())
    }

    /// Same as [`Capability::allow_client_outgoing`], with extra parameters
    /// Twilio forwards to the application's voice URL.
    pub fn allow_client_outgoing_with_params<I, K, V>(
        &mut self,
        app_sid: impl Into<String>,
        app_params: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut scope = ScopeUri::new("client", "outgoing").with_param("appSid", app_sid);
        let mut params = url::form_urlencoded::Serializer::new(String::new());
        let mut has_params = false;
        for (key, value) in app_params {
            params.append_pair(key.as_ref(), value.as_ref());
            has_params = true;
        }
        if has_params {
            scope.add_param("appParams", params.finish());
        }
        self.outgoing = Some(scope);
        self
    }

    /// Scope URIs in the order they are written into the token.
    pub fn scopes(&self) -> Vec<ScopeUri> {
        let mut scopes = Vec::with_capacity(2);
        if let Some(incoming) = &self.incoming {
            scopes.push(incoming.clone());
        }
        if let Some(outgoing) = &self.outgoing {
            let mut outgoing = outgoing.clone();
            if let Some(name) = &self.client_name {
                outgoing.add_param("clientName", name);
            }
            scopes.push(outgoing);
        }
        scopes
    }

    /// Sign the granted scopes into a token valid for `ttl_seconds`.
    pub fn generate(&self, ttl_seconds: u64) -> CapabilityResult<String> {
        if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&ttl_seconds) {
            return Err(CapabilityError::TtlOutOfRange(ttl_seconds));
        }
        let ttl = i64::try_from(ttl_seconds)
            .map_err(|_| CapabilityError::TtlOutOfRange(ttl_seconds))?;
        let exp = OffsetDateTime::now_utc()
            .unix_timestamp()
            .checked_add(ttl)
            .ok_or(CapabilityError::TtlOutOfRange(ttl_seconds))?;

        let claims = CapabilityClaims {
            scope: self
                .scopes()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            iss: self.account_sid.clone(),
            exp,
        };

        debug!(
            account_sid = %self.account_sid,
            scope = %claims.scope,
            exp = claims.exp,
            "Signing capability token"
        );

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.auth_token.as_bytes()),
        )
        .map_err(CapabilityError::Signing)
    }
}

/// Verify a token's signature and expiry, returning its claims.
pub fn decode_token(token: &str, auth_token: &str) -> CapabilityResult<CapabilityClaims> {
    let validation = Validation::new(Algorithm::HS256);
    jsonwebtoken::decode::<CapabilityClaims>(
        token,
        &DecodingKey::from_secret(auth_token.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(CapabilityError::InvalidToken)
}
