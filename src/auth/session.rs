//! Session management for Belvo API authentication.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use crate::Result;

/// Outcome of a login attempt.
///
/// The token endpoint reports invalid credentials purely through the HTTP
/// status code, so a rejected login is an ordinary outcome rather than an
/// error. Transport failures still surface as [`crate::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LoginOutcome {
    /// Credentials were accepted and a token pair was installed.
    LoggedIn,
    /// The API rejected the credentials (non-2xx). Prior token state is
    /// left untouched.
    Denied,
}

impl LoginOutcome {
    /// Returns `true` if the login succeeded.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, LoginOutcome::LoggedIn)
    }
}

/// Authentication session for the Belvo API.
///
/// The session owns the configured base URL and the mutable credential pair
/// (short-lived access token, longer-lived refresh token). It is cheap to
/// clone and shares token state across clones.
///
/// # Thread Safety
///
/// Token state lives behind an async `RwLock`; replacing the pair via
/// [`login`](Session::login) or [`set_tokens`](Session::set_tokens) is safe
/// across tasks, though interleaving re-logins from several tasks gives
/// whichever pair lands last.
#[derive(Clone)]
pub struct Session {
    base_url: String,
    tokens: Arc<RwLock<TokenPair>>,
}

#[derive(Default)]
struct TokenPair {
    access: Option<SecretString>,
    refresh: Option<SecretString>,
}

impl Session {
    /// Create an unauthenticated session against the given origin.
    ///
    /// A trailing slash on the base URL is ignored; endpoint paths always
    /// start with `/`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let parsed = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            tokens: Arc::new(RwLock::new(TokenPair::default())),
        })
    }

    /// Exchange credentials for a token pair at `POST {base}/api/token`.
    ///
    /// On a 2xx response with an `{access, refresh}` body, both tokens are
    /// stored and subsequent requests carry `Authorization: Bearer <access>`.
    /// On any non-2xx status this returns [`LoginOutcome::Denied`] without
    /// touching existing token state. Network and JSON-decoding failures
    /// propagate as errors.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let client = reqwest::Client::new();
        let url = format!("{}/api/token", self.base_url);

        let response = client
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "login rejected");
            return Ok(LoginOutcome::Denied);
        }

        let token_response: TokenResponse = response.json().await?;
        let mut tokens = self.tokens.write().await;
        tokens.access = Some(SecretString::from(token_response.access));
        tokens.refresh = Some(SecretString::from(token_response.refresh));
        Ok(LoginOutcome::LoggedIn)
    }

    /// Install a credential pair directly, without a network call.
    ///
    /// Used to resume a session from tokens obtained elsewhere.
    pub async fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        let mut tokens = self.tokens.write().await;
        tokens.access = Some(SecretString::from(access.into()));
        tokens.refresh = Some(SecretString::from(refresh.into()));
    }

    /// The current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .access
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// The current refresh token, if any.
    ///
    /// Stored for session resumption; this layer never exchanges it itself.
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .refresh
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// Whether a credential pair is currently installed.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.access.is_some()
    }

    /// The configured origin, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Bearer <access>` header value for outgoing requests, if logged in.
    pub(crate) async fn bearer_header(&self) -> Option<String> {
        self.tokens
            .read()
            .await
            .access
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: String,
    refresh: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_tokens_round_trip() {
        let session = Session::new("https://sandbox.belvo.com").unwrap();
        session.set_tokens("some-access", "some-refresh").await;

        assert_eq!(session.access_token().await.as_deref(), Some("some-access"));
        assert_eq!(
            session.refresh_token().await.as_deref(),
            Some("some-refresh")
        );
        assert!(session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_bearer_header_uses_access_token() {
        let session = Session::new("https://sandbox.belvo.com").unwrap();
        assert!(session.bearer_header().await.is_none());

        session.set_tokens("abc123", "def456").await;
        assert_eq!(session.bearer_header().await.as_deref(), Some("Bearer abc123"));
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let session = Session::new("https://sandbox.belvo.com/").unwrap();
        assert_eq!(session.base_url(), "https://sandbox.belvo.com");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(Session::new("not a url").is_err());
    }

    #[tokio::test]
    async fn test_session_debug_redacts_tokens() {
        let session = Session::new("https://sandbox.belvo.com").unwrap();
        session.set_tokens("super-secret-token", "other-secret").await;

        let debug_str = format!("{:?}", session);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(!debug_str.contains("other-secret"));
        assert!(debug_str.contains("REDACTED"));
    }
}
