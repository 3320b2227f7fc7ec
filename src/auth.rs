//! OAuth2 client-credentials authentication for the Microsoft identity platform.
//!
//! Acquires bearer tokens from Azure AD's `/oauth2/v2.0/token` endpoint using
//! the client_credentials grant, scoped to Microsoft Graph's default
//! application permissions. The token is cached in `TokenProvider` and can be
//! refreshed on demand. Consumers (e.g. `GraphClient`) read the cached token
//! via `token()` and call `refresh_token()` when it is absent or stale.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// Azure AD v2.0 token endpoint. `{tenant_id}` is replaced at runtime.
const TOKEN_URL: &str = "https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token";

/// Default application permission scope for Microsoft Graph.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Connect + request timeout for token requests. Token responses are small;
/// anything slower than this indicates an endpoint problem.
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Form body sent to the token endpoint.
/// Fields are serialized as `application/x-www-form-urlencoded` by reqwest's `.form()`.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    scope: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// Subset of the Azure AD token response that we need.
/// The endpoint returns additional fields (e.g. `ext_expires_in`) which are
/// silently ignored by serde because we don't mark the struct `deny_unknown_fields`.
#[derive(Deserialize)]
pub struct TokenResponse {
    /// The bearer token to attach to Graph requests.
    pub access_token: String,
    /// Token type, always `"Bearer"` for this grant.
    pub token_type: String,
    /// Token lifetime in seconds from acquisition.
    pub expires_in: u64,
}

/// Safety buffer subtracted from `expires_in` to trigger refresh before
/// the token actually expires. Prevents requests from racing the expiry boundary.
const EXPIRY_BUFFER_SECS: u64 = 60;

/// Manages OAuth2 token acquisition and caching.
///
/// Invariants:
/// - `response` is `None` until the first successful `refresh_token()` call.
/// - After a successful refresh, `token()` returns `Some` until the token
///   expires (with a 60-second safety buffer), the provider is dropped,
///   or the token is replaced by a subsequent refresh or `invalidate()`.
/// - `acquired_at` is always `Some` when `response` is `Some`.
pub struct TokenProvider {
    client: reqwest::Client,
    token_url: String,
    scope: String,
    client_id: String,
    client_secret: String,
    response: Option<TokenResponse>,
    acquired_at: Option<Instant>,
}

impl TokenProvider {
    /// Creates a provider from the credential config, scoped to
    /// [`GRAPH_DEFAULT_SCOPE`].
    pub fn new(config: &GraphConfig) -> Self {
        Self::with_scope(config, GRAPH_DEFAULT_SCOPE)
    }

    /// Creates a provider with an explicit scope string.
    pub fn with_scope(config: &GraphConfig, scope: &str) -> Self {
        TokenProvider {
            client: build_token_client(),
            token_url: TOKEN_URL.replace("{tenant_id}", &config.tenant_id),
            scope: scope.to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            response: None,
            acquired_at: None,
        }
    }

    /// Creates a `TokenProvider` with a pre-set token, bypassing Azure AD.
    /// Used by tests to avoid real HTTP calls during token acquisition.
    /// The token is treated as freshly acquired (expires_in = 3600s).
    pub fn with_token(token: &str) -> Self {
        TokenProvider {
            client: build_token_client(),
            token_url: TOKEN_URL.to_string(),
            scope: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            response: Some(TokenResponse {
                access_token: token.to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
            }),
            acquired_at: Some(Instant::now()),
        }
    }

    /// Points the provider at a custom token endpoint, used by tests to
    /// exercise the refresh path against a local mock server.
    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self
    }

    /// Fetches a new token from Azure AD and caches it.
    ///
    /// The response body is read as text first so that on failure the raw
    /// AADSTS error message is preserved in the error — `error_for_status()`
    /// would discard this diagnostic information.
    pub async fn refresh_token(&mut self) -> Result<()> {
        let body = TokenRequest {
            client_id: &self.client_id,
            scope: &self.scope,
            client_secret: &self.client_secret,
            grant_type: "client_credentials",
        };

        debug!(scope = %self.scope, "requesting access token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&body)
            .send()
            .await
            .map_err(|e| GraphError::Auth {
                message: "token request failed to send".to_string(),
                source: Some(Box::new(e)),
            })?;

        // Read body before checking status so we can surface Microsoft's
        // detailed error (AADSTS codes) on failure.
        let status = response.status();
        let body = response.text().await.map_err(|e| GraphError::Auth {
            message: "failed to read token response body".to_string(),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(GraphError::Auth {
                message: format!("token request failed ({status}): {body}"),
                source: None,
            });
        }

        let resp: TokenResponse =
            serde_json::from_str(&body).map_err(|e| GraphError::Auth {
                message: "failed to parse token response".to_string(),
                source: Some(Box::new(e)),
            })?;
        self.acquired_at = Some(Instant::now());
        self.response = Some(resp);

        Ok(())
    }

    /// Discards the cached token so the next `refresh_token()` fetches a
    /// fresh one. Called when the Graph API rejects a token the local
    /// expiry tracking still considered valid.
    pub fn invalidate(&mut self) {
        self.response = None;
        self.acquired_at = None;
    }

    /// Returns `true` if a token exists but has exceeded its lifetime
    /// (minus the safety buffer). Returns `false` if no token is cached.
    fn is_expired(&self) -> bool {
        match (&self.response, self.acquired_at) {
            (Some(resp), Some(acquired)) => {
                let lifetime = resp.expires_in.saturating_sub(EXPIRY_BUFFER_SECS);
                acquired.elapsed().as_secs() >= lifetime
            }
            _ => false,
        }
    }

    /// Returns the cached access token, or `None` if no token exists
    /// or the token has expired (with a 60-second safety buffer).
    pub fn token(&self) -> Option<&str> {
        if self.is_expired() {
            return None;
        }
        self.response.as_ref().map(|ret| ret.access_token.as_str())
    }
}

fn build_token_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(TOKEN_REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client for token endpoint")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GraphConfig {
        GraphConfig {
            tenant_id: "tenant".to_string(),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn token_is_none_before_refresh() {
        let tp = TokenProvider::new(&test_config());
        assert!(
            tp.token().is_none(),
            "token must be None before any refresh"
        );
    }

    #[test]
    fn token_url_interpolates_tenant() {
        let config = GraphConfig {
            tenant_id: "abc-123".to_string(),
            ..test_config()
        };
        let tp = TokenProvider::new(&config);
        assert_eq!(
            tp.token_url,
            "https://login.microsoftonline.com/abc-123/oauth2/v2.0/token"
        );
    }

    #[test]
    fn default_scope_targets_graph() {
        let tp = TokenProvider::new(&test_config());
        assert_eq!(tp.scope, "https://graph.microsoft.com/.default");
    }

    #[test]
    fn token_request_serializes_as_form() {
        let req = TokenRequest {
            client_id: "cid",
            scope: GRAPH_DEFAULT_SCOPE,
            client_secret: "secret~value",
            grant_type: "client_credentials",
        };
        let encoded = serde_urlencoded::to_string(&req).unwrap();
        assert!(encoded.contains("client_id=cid"));
        assert!(encoded.contains("grant_type=client_credentials"));
        // Scope URL should be percent-encoded in form data
        assert!(encoded.contains("scope=https"));
    }

    #[test]
    fn token_response_deserializes_from_azure_format() {
        let json = r#"{
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "eyJ0eXAi.test.token"
        }"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "eyJ0eXAi.test.token");
        assert_eq!(resp.token_type, "Bearer");
        assert_eq!(resp.expires_in, 3599);
    }

    #[test]
    fn token_response_ignores_unknown_fields() {
        // Azure AD returns extra fields like ext_expires_in that we don't model.
        let json = r#"{
            "token_type": "Bearer",
            "expires_in": 3599,
            "ext_expires_in": 3599,
            "access_token": "tok"
        }"#;
        let resp: std::result::Result<TokenResponse, _> = serde_json::from_str(json);
        assert!(resp.is_ok(), "should ignore unknown fields by default");
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let tp = TokenProvider::with_token("test-token");
        assert!(
            tp.token().is_some(),
            "freshly created token must be available"
        );
    }

    #[test]
    fn expired_token_returns_none() {
        // Simulate a token that expired in the past by setting acquired_at
        // far enough back that expires_in - buffer has elapsed.
        let mut tp = TokenProvider::with_token("test-token");
        tp.acquired_at = Some(Instant::now() - Duration::from_secs(7200));
        assert!(
            tp.token().is_none(),
            "token must be None after expiry"
        );
    }

    #[test]
    fn token_within_buffer_returns_none() {
        // A token with expires_in=90 and a 60s buffer has an effective
        // lifetime of 30s. After 31s it should appear expired.
        let mut tp = TokenProvider::with_token("test-token");
        tp.response.as_mut().unwrap().expires_in = 90;
        tp.acquired_at = Some(Instant::now() - Duration::from_secs(31));
        assert!(
            tp.token().is_none(),
            "token must be None when within the safety buffer"
        );
    }

    #[test]
    fn token_before_buffer_returns_some() {
        // Same setup as above but only 10s elapsed — well within the 30s
        // effective lifetime.
        let mut tp = TokenProvider::with_token("test-token");
        tp.response.as_mut().unwrap().expires_in = 90;
        tp.acquired_at = Some(Instant::now() - Duration::from_secs(10));
        assert!(
            tp.token().is_some(),
            "token must still be valid before buffer boundary"
        );
    }

    #[test]
    fn invalidate_discards_cached_token() {
        let mut tp = TokenProvider::with_token("test-token");
        assert!(tp.token().is_some());
        tp.invalidate();
        assert!(
            tp.token().is_none(),
            "token must be None after invalidation"
        );
    }
}
