//! Typed error hierarchy for the graph-users crate.
//!
//! `GraphError` is a structured enum that preserves diagnostic context at
//! each failure boundary. Every variant carries enough information for
//! callers to:
//! - Distinguish the failure category (config, auth, API, parse, network).
//! - Inspect the original cause via `source()` (thiserror derives this
//!   automatically from `#[source]` fields).
//! - Display a human-readable message that includes the relevant context
//!   (variable name, status code, response body, etc.).
//!
//! Variants map to real system boundaries: `Config` covers the process
//! environment, `Auth` covers the Azure AD token endpoint, `Api` covers the
//! Microsoft Graph REST API, and `Network`/`Parse` cover the transport and
//! deserialization layers underneath both.

use reqwest::StatusCode;

/// Unified error type for all graph-users library operations.
///
/// Each variant corresponds to a distinct failure boundary in the system.
/// The `#[source]` attribute on inner errors enables `Error::source()`
/// chaining so callers (and logging frameworks) can traverse the full
/// cause chain.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A required configuration value was missing or empty.
    ///
    /// The credential trio (`CLIENT_ID`, `TENANT_ID`, `CLIENT_SECRET`) is
    /// read from the process environment at startup. Any absent or blank
    /// value fails configuration loading with the offending variable named.
    #[error("missing or empty environment variable: {name}")]
    Config {
        /// Name of the environment variable that was missing or empty.
        name: &'static str,
    },

    /// Authentication failure at the Azure AD token endpoint.
    ///
    /// This covers:
    /// - Non-2xx responses from `/oauth2/v2.0/token` (invalid credentials,
    ///   expired secrets, misconfigured permissions). The message contains
    ///   Azure AD's AADSTS error codes and human-readable text.
    /// - Network failures reaching the token endpoint.
    /// - Missing token after a refresh attempt (internal invariant violation).
    #[error("authentication failed: {message}")]
    Auth {
        /// Human-readable description of the authentication failure,
        /// including HTTP status and Azure AD error body when available.
        message: String,
        /// The underlying transport or parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Microsoft Graph returned a non-success HTTP status code.
    ///
    /// The full response body is preserved. Graph error responses contain
    /// diagnostic codes and human-readable explanations (e.g. UPN naming
    /// collisions on create, `Request_ResourceNotFound` on delete) that are
    /// essential for debugging permission issues and invalid request shapes.
    #[error("Graph API error {status}: {body}")]
    Api {
        /// The HTTP status code returned by Microsoft Graph.
        status: StatusCode,
        /// The raw response body text. May contain JSON error details
        /// from Graph, or an empty string if the body could not be read.
        body: String,
    },

    /// JSON deserialization failed when parsing an API response body.
    ///
    /// This can occur if Graph returns an unexpected response shape for
    /// a `$select` projection we did not anticipate.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A network-level failure occurred (DNS resolution, TCP connection,
    /// TLS handshake, request timeout, etc.).
    ///
    /// No HTTP status code is available because the request did not
    /// complete. This wraps the underlying `reqwest::Error` which carries
    /// detailed transport diagnostics.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Convenience alias used throughout the library.
/// Keeps function signatures concise while providing the full typed error.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_names_the_variable() {
        let err = GraphError::Config { name: "TENANT_ID" };
        let msg = err.to_string();
        assert!(
            msg.contains("TENANT_ID"),
            "display should name the missing variable"
        );
    }

    #[test]
    fn auth_error_displays_message() {
        let err = GraphError::Auth {
            message: "token request failed (401): AADSTS7000215".to_string(),
            source: None,
        };
        let msg = err.to_string();
        assert!(
            msg.contains("AADSTS7000215"),
            "display should include the Azure AD error code"
        );
        assert!(
            msg.contains("authentication failed"),
            "display should indicate auth failure"
        );
    }

    #[test]
    fn auth_error_with_source_chains_correctly() {
        // Simulate a serde parse error as the underlying cause.
        let json_err: serde_json::Error = serde_json::from_str::<String>("not-json").unwrap_err();
        let err = GraphError::Auth {
            message: "failed to parse token response".to_string(),
            source: Some(Box::new(json_err)),
        };
        // The source() chain should reach the serde error.
        assert!(
            err.source().is_some(),
            "Auth error with source should have a chained cause"
        );
    }

    #[test]
    fn api_error_preserves_status_and_body() {
        let err = GraphError::Api {
            status: StatusCode::CONFLICT,
            body: r#"{"error":{"code":"Request_BadRequest","message":"Another object with the same value for property userPrincipalName already exists."}}"#
                .to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("409"), "display should include status code");
        assert!(
            msg.contains("userPrincipalName"),
            "display should include response body"
        );
    }

    #[test]
    fn parse_error_wraps_serde_json() {
        let json_err: serde_json::Error =
            serde_json::from_str::<String>("{{bad json}}").unwrap_err();
        let err = GraphError::Parse(json_err);
        let msg = err.to_string();
        assert!(
            msg.contains("failed to parse response"),
            "display should indicate parse failure"
        );
        // source() should be the serde_json::Error
        assert!(
            err.source().is_some(),
            "Parse variant should chain to serde_json::Error"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        // GraphError must be Send + Sync for use across async task boundaries.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphError>();
    }
}
