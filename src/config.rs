//! Configuration loading for the Graph demo client.
//!
//! The three credential values of the client-credentials flow are read from
//! the process environment (`CLIENT_ID`, `TENANT_ID`, `CLIENT_SECRET`).
//! [`load_env_files`] can pre-populate the environment from `.env` /
//! `.env.local` files before reading; `.env.local` is loaded first so its
//! values win (dotenvy never overrides variables that are already set).
//!
//! Configuration is an explicit struct owned by the caller — there is no
//! process-global credential state.

use crate::error::{GraphError, Result};
use std::env;

/// Environment variable holding the Azure AD application (client) ID.
pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
/// Environment variable holding the Azure AD tenant ID.
pub const TENANT_ID_VAR: &str = "TENANT_ID";
/// Environment variable holding the Azure AD client secret.
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

/// Credentials for authenticating against Azure AD as an application.
///
/// All three values are opaque strings from the tenant's app registration.
/// Validation beyond non-emptiness is left to the token endpoint, which
/// rejects malformed or revoked credentials with a descriptive AADSTS error.
#[derive(Clone)]
pub struct GraphConfig {
    /// Azure AD tenant (directory) ID.
    pub tenant_id: String,
    /// Azure AD application (client) ID.
    pub client_id: String,
    /// Azure AD client secret.
    pub client_secret: String,
}

impl GraphConfig {
    /// Reads the credential trio from the process environment.
    ///
    /// # Errors
    ///
    /// `GraphError::Config` naming the first variable that is missing or
    /// blank. Whitespace-only values count as blank — an empty secret would
    /// otherwise fail much later with a confusing token-endpoint error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// `from_env` delegates here; tests supply a closure over a map so they
    /// never mutate the real process environment (which is shared across
    /// concurrently running tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(GraphConfig {
            tenant_id: required(&get, TENANT_ID_VAR)?,
            client_id: required(&get, CLIENT_ID_VAR)?,
            client_secret: required(&get, CLIENT_SECRET_VAR)?,
        })
    }
}

// Secrets stay out of Debug output; only the non-sensitive fields print.
impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn required(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String> {
    match get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GraphError::Config { name }),
    }
}

/// Loads `.env.local` and `.env` from the working directory, if present.
///
/// `.env.local` is loaded first so its values take precedence over `.env`
/// for local overrides. Both files are optional — a missing file is not an
/// error, matching the demo's "run with plain environment variables" mode.
pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_lookup_reads_all_three_values() {
        let map = vars(&[
            ("TENANT_ID", "tid-123"),
            ("CLIENT_ID", "cid-456"),
            ("CLIENT_SECRET", "s3cret~value"),
        ]);
        let config = GraphConfig::from_lookup(|n| map.get(n).cloned()).unwrap();
        assert_eq!(config.tenant_id, "tid-123");
        assert_eq!(config.client_id, "cid-456");
        assert_eq!(config.client_secret, "s3cret~value");
    }

    #[test]
    fn missing_variable_is_a_config_error_naming_it() {
        let map = vars(&[("TENANT_ID", "tid-123"), ("CLIENT_ID", "cid-456")]);
        let err = GraphConfig::from_lookup(|n| map.get(n).cloned()).unwrap_err();
        assert!(
            err.to_string().contains("CLIENT_SECRET"),
            "error should name the missing variable, got: {err}"
        );
    }

    #[test]
    fn blank_variable_is_rejected() {
        // A variable that is set but whitespace-only would produce a
        // confusing AADSTS error from the token endpoint later. Reject it
        // at load time instead.
        let map = vars(&[
            ("TENANT_ID", "   "),
            ("CLIENT_ID", "cid-456"),
            ("CLIENT_SECRET", "secret"),
        ]);
        let err = GraphConfig::from_lookup(|n| map.get(n).cloned()).unwrap_err();
        assert!(err.to_string().contains("TENANT_ID"));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let config = GraphConfig {
            tenant_id: "tid".to_string(),
            client_id: "cid".to_string(),
            client_secret: "super-secret".to_string(),
        };
        let debug = format!("{config:?}");
        assert!(
            !debug.contains("super-secret"),
            "Debug must not leak the client secret: {debug}"
        );
        assert!(debug.contains("tid"));
    }
}
