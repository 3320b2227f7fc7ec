//! Async Rust client library for managing Microsoft Graph users with
//! application (client-credentials) authentication.
//!
//! Provides OAuth2 authentication, an authenticated HTTP client with 401
//! retry, and the four demo operations against the `/users` endpoint
//! family: list, create, delete by name, and update by name.
//!
//! # Modules
//!
//! - [`auth`] — OAuth2 client credentials token provider with expiry tracking.
//! - [`client`] — Authenticated HTTP wrapper for the Graph REST API.
//! - [`config`] — Credential loading from the environment and `.env` files.
//! - [`error`] — Typed error hierarchy (`GraphError`) for all library operations.
//! - [`users`] — User models, request bodies, and endpoint functions.
//!
//! # Quick Start
//!
//! ```ignore
//! use graph_users::auth::TokenProvider;
//! use graph_users::client::GraphClient;
//! use graph_users::config::GraphConfig;
//! use graph_users::users;
//!
//! let config = GraphConfig::from_env()?;
//! let client = GraphClient::new(TokenProvider::new(&config));
//! let page = users::list_users(&client).await?;
//! println!("more available: {}", page.has_more());
//! ```

#![warn(missing_docs)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod users;
