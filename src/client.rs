//! Authenticated HTTP client for the Microsoft Graph API.
//!
//! `GraphClient` wraps a `reqwest::Client` and a `TokenProvider` behind a
//! `Mutex`, providing ergonomic JSON-based request helpers (`get`, `post`)
//! and no-content helpers (`patch`, `delete`) for the endpoints that reply
//! `204 No Content`.
//!
//! Token lifecycle:
//! - Lazy acquisition: the first request that finds no cached token triggers
//!   `refresh_token()` automatically via `bearer_token()`.
//! - Expiry-aware: `TokenProvider::token()` returns `None` when the cached
//!   token has expired, which triggers a fresh refresh on the next request.
//! - One-shot 401 retry: if Graph returns `401 Unauthorized` (e.g. because
//!   the token was revoked server-side before our local expiry check caught
//!   it), the client invalidates the cached token, refreshes once, and
//!   retries the request exactly once. A second 401 is treated as a hard
//!   failure — no infinite retry loop.

use crate::auth::TokenProvider;
use crate::error::{GraphError, Result};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

const BASE_URL: &str = "https://graph.microsoft.com/v1.0/";

/// Connect timeout for the Graph API HTTP client.
/// Covers TCP + TLS handshake only. 10 seconds is generous for Azure services.
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout for Graph API calls.
/// Covers the full round-trip including response body download. User
/// payloads are small JSON documents, so 30 seconds is ample.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a `reqwest::Client` with explicit timeouts for Graph API calls.
///
/// Separate from the `TokenProvider`'s client so the two can carry
/// different timeout policies.
fn build_api_client() -> Client {
    Client::builder()
        .connect_timeout(API_CONNECT_TIMEOUT)
        .timeout(API_REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client for Graph API")
}

/// Authenticated HTTP client for the Microsoft Graph REST API.
///
/// Design decisions:
/// - `auth` is behind a `Mutex` because `refresh_token()` requires `&mut self`
///   while API methods only need `&self`. The lock is held only for the brief
///   token check/refresh, never across an HTTP round-trip.
/// - `base_url` is stored as a `String` rather than a `&'static str` so it
///   can be overridden in tests (e.g. pointing at a wiremock server).
pub struct GraphClient {
    client: Client,
    base_url: String,
    auth: Mutex<TokenProvider>,
}

impl GraphClient {
    /// Creates a client bound to the production Graph v1.0 endpoint.
    pub fn new(auth: TokenProvider) -> Self {
        GraphClient {
            client: build_api_client(),
            base_url: BASE_URL.to_string(),
            auth: Mutex::new(auth),
        }
    }

    /// Constructor that accepts a custom base URL, used by tests to point
    /// at a local mock server instead of the real Graph API.
    pub fn with_base_url(auth: TokenProvider, base_url: &str) -> Self {
        GraphClient {
            client: build_api_client(),
            base_url: base_url.to_string(),
            auth: Mutex::new(auth),
        }
    }

    /// Returns a valid bearer token, refreshing if none is cached or if the
    /// current token has expired.
    ///
    /// The mutex is held only for the token check and optional refresh.
    /// If refresh itself fails, the error propagates to the caller.
    async fn bearer_token(&self) -> Result<String> {
        let mut auth = self.auth.lock().await;
        if auth.token().is_none() {
            auth.refresh_token().await?;
        }

        auth.token()
            .map(str::to_owned)
            .ok_or_else(|| GraphError::Auth {
                message: "token missing after refresh".to_string(),
                source: None,
            })
    }

    /// Invalidates the current token and acquires a fresh one from Azure AD.
    ///
    /// Called when the API returns 401, indicating the token was rejected
    /// server-side (revocation, clock skew, etc.) before our local expiry
    /// tracking detected it.
    async fn force_refresh(&self) -> Result<String> {
        let mut auth = self.auth.lock().await;
        auth.invalidate();
        auth.refresh_token().await?;

        auth.token()
            .map(str::to_owned)
            .ok_or_else(|| GraphError::Auth {
                message: "token missing after forced refresh".to_string(),
                source: None,
            })
    }

    /// Core HTTP method: sends an authenticated request and returns the
    /// response once its status is known to be a success. All verb-specific
    /// helpers delegate here.
    ///
    /// `path` is relative to `base_url` (no leading slash needed).
    /// `body` is serialized as JSON when present; omitted for GET/DELETE.
    ///
    /// 401 retry behavior:
    /// - If the response is `401 Unauthorized`, the client assumes the token
    ///   was rejected server-side. It invalidates the cached token, acquires
    ///   a fresh one, and retries the request exactly once.
    /// - If the retry also fails, the error propagates to the caller.
    /// - Non-401 error status codes (403, 404, 409, etc.) are never retried
    ///   and surface as `GraphError::Api` with the response body preserved.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "sending Graph request");

        // First attempt with current (possibly cached) token.
        let token = self.bearer_token().await?;
        let mut resp = self
            .build_request(method.clone(), &url, &token, body)
            .send()
            .await?;

        // On 401, force a token refresh and retry exactly once.
        // Any other status (success or non-401 error) skips the retry path.
        if resp.status() == StatusCode::UNAUTHORIZED {
            debug!(%url, "Graph returned 401, refreshing token and retrying once");
            let fresh_token = self.force_refresh().await?;
            resp = self
                .build_request(method, &url, &fresh_token, body)
                .send()
                .await?;
        }

        let status = resp.status();
        if !status.is_success() {
            // Read the body so Graph's diagnostic error payload survives.
            let body = resp.text().await.unwrap_or_default();
            return Err(GraphError::Api { status, body });
        }

        Ok(resp)
    }

    /// Constructs an authenticated request builder with optional JSON body.
    ///
    /// Factored out of `send` so the first attempt and retry can both build
    /// requests without duplicating the header/body attachment logic.
    fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&B>,
    ) -> reqwest::RequestBuilder {
        let mut req = self.client.request(method, url).bearer_auth(token);
        if let Some(payload) = body {
            req = req.json(payload);
        }
        req
    }

    /// Deserializes a success response body, routing malformed JSON to
    /// `GraphError::Parse` rather than a transport error.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends an authenticated GET request and deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(resp).await
    }

    /// Sends an authenticated POST request with a JSON body and deserializes
    /// the response.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(resp).await
    }

    /// Sends an authenticated PATCH request with a JSON body, discarding the
    /// response body.
    ///
    /// Graph replies `204 No Content` to property updates (e.g.
    /// `PATCH /users/{id}`), so there is nothing to deserialize.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(Method::PATCH, path, Some(body)).await?;
        Ok(())
    }

    /// Sends an authenticated DELETE request, discarding the response body.
    ///
    /// Graph replies `204 No Content` on successful deletion.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}
