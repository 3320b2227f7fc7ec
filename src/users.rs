//! User management against the Microsoft Graph `/users` endpoint family.
//!
//! This module covers the four demo operations:
//!
//! - [`list_users`] — retrieve the first page of users, projected and sorted.
//! - [`create_user`] — create a user from a [`NewUser`] request body.
//! - [`delete_user`] / [`delete_user_by_name`] — remove a user by id, or by
//!   resolving a display name first.
//! - [`update_user`] / [`update_user_by_name`] — patch contact properties by
//!   id, or by resolving a display name first.
//!
//! Name resolution is deliberately a separate helper,
//! [`find_user_by_name`]: display names are not unique, so resolving one to
//! an id is a fallible lookup, not an addressing scheme. The mutating
//! `*_by_name` operations compose the lookup with an id-based call and
//! report "no match" as a plain `false` rather than an error.
//!
//! ## Permissions
//!
//! All endpoints require the `User.ReadWrite.All` application permission
//! (admin-consented) when using the client-credentials flow.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::GraphClient;

// ── Response types ─────────────────────────────────────────────────────

/// A user as returned by the Graph API.
///
/// Field names use camelCase to match the Graph contract exactly. Every
/// field except `id` is optional: list responses are projected down to
/// `displayName`/`id`/`mail` by `$select`, so the remaining properties are
/// simply absent there.
///
/// Reference: <https://learn.microsoft.com/en-us/graph/api/resources/user>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned object id (a GUID). The only stable address for
    /// mutation calls.
    pub id: String,

    /// Display name shown in the directory (e.g. `"Melissa Darrow"`).
    #[serde(default)]
    pub display_name: Option<String>,

    /// Primary SMTP address. Frequently absent — unlicensed demo accounts
    /// have no mailbox.
    #[serde(default)]
    pub mail: Option<String>,

    /// Whether the account is enabled for sign-in.
    #[serde(default)]
    pub account_enabled: Option<bool>,

    /// Mail alias (the local part used for the mailbox nickname).
    #[serde(default)]
    pub mail_nickname: Option<String>,

    /// Sign-in name, `alias@tenant-domain` form.
    #[serde(default)]
    pub user_principal_name: Option<String>,

    /// Business phone numbers. Graph models this as a list even though the
    /// portal only surfaces a single entry.
    #[serde(default)]
    pub business_phones: Vec<String>,

    /// Office location in the user's place of business.
    #[serde(default)]
    pub office_location: Option<String>,
}

/// One page of users from the list endpoint.
///
/// Graph wraps collections in `{ "value": [...] }` and signals that more
/// results exist server-side with an `@odata.nextLink` URL. The demo never
/// follows the link — it only reports whether one was present.
#[derive(Debug, Deserialize)]
pub struct UserPage {
    /// The users in this page, in server-applied `$orderby` order.
    pub value: Vec<User>,

    /// Continuation URL for the next page, if more results exist.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

impl UserPage {
    /// Whether more users exist server-side beyond this page.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

// ── Request types ──────────────────────────────────────────────────────

/// Request body for `POST /users`.
///
/// These are the properties Graph requires for user creation; everything
/// else is left to server defaults.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Whether the account can sign in immediately.
    pub account_enabled: bool,
    /// Display name for the directory entry.
    pub display_name: String,
    /// Mail alias.
    pub mail_nickname: String,
    /// Sign-in name; must be unique within the tenant, collisions are
    /// rejected by the server with a 400.
    pub user_principal_name: String,
    /// Initial password settings.
    pub password_profile: PasswordProfile,
}

/// Password settings for a newly created user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    /// Forces a password change on first sign-in.
    pub force_change_password_next_sign_in: bool,
    /// Initial password.
    pub password: String,
}

impl NewUser {
    /// The fixed demo record created by menu option 2.
    pub fn demo() -> Self {
        NewUser {
            account_enabled: true,
            display_name: "Melissa Darrow".to_string(),
            mail_nickname: "MelissaD".to_string(),
            user_principal_name: "MelissaD@timkrebs9outlook.onmicrosoft.com".to_string(),
            password_profile: PasswordProfile {
                force_change_password_next_sign_in: true,
                password: "xWwvJ]6NMw+bWH-d".to_string(),
            },
        }
    }
}

/// Request body for `PATCH /users/{id}`.
///
/// Only the two contact properties the demo touches. Both are optional —
/// a `None` field is omitted from the JSON body entirely so the server
/// leaves that property unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    /// Replacement business phone list. `None` leaves phones unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_phones: Option<Vec<String>>,

    /// New office location. `None` leaves the location unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
}

impl UpdateUser {
    /// The fixed contact-detail update applied by menu option 4.
    pub fn demo_contact() -> Self {
        UpdateUser {
            business_phones: Some(vec!["+1 425 555 0109".to_string()]),
            office_location: Some("18/2111".to_string()),
        }
    }
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Query string for the list endpoint: at most 25 users, projected down to
/// the three fields the demo displays, sorted ascending by display name.
const LIST_USERS_QUERY: &str = "users?$select=displayName,id,mail&$top=25&$orderby=displayName";

/// Retrieves the first page of users in the tenant.
///
/// At most 25 records are requested, projected to `displayName`/`id`/`mail`
/// and sorted ascending by display name. No pagination loop is performed;
/// [`UserPage::has_more`] only reports whether a continuation link exists.
///
/// # Errors
///
/// - `GraphError::Api` — non-success status (e.g. 403 for a missing
///   `User.ReadWrite.All` grant).
/// - `GraphError::Auth` — token acquisition or refresh failed.
/// - `GraphError::Network` — transport-level failure.
pub async fn list_users(client: &GraphClient) -> crate::error::Result<UserPage> {
    client.get(LIST_USERS_QUERY).await
}

/// Creates a user and returns the record as the server stored it,
/// including the assigned object id.
///
/// # Errors
///
/// - `GraphError::Api` — non-success status. A 400 with
///   `Request_BadRequest` typically means the `userPrincipalName` already
///   exists in the tenant; the server's message is preserved verbatim.
/// - `GraphError::Auth` — token acquisition or refresh failed.
/// - `GraphError::Network` — transport-level failure.
pub async fn create_user(client: &GraphClient, new_user: &NewUser) -> crate::error::Result<User> {
    client.post("users", new_user).await
}

/// Deletes a user by object id.
///
/// Graph replies `204 No Content` on success. Deleted users land in the
/// tenant's 30-day recycle bin, not permanent removal.
///
/// # Errors
///
/// - `GraphError::Api` — non-success status. A 404 means the id does not
///   exist (or was already deleted).
/// - `GraphError::Auth` — token acquisition or refresh failed.
/// - `GraphError::Network` — transport-level failure.
pub async fn delete_user(client: &GraphClient, user_id: &str) -> crate::error::Result<()> {
    let path = format!("users/{user_id}");
    client.delete(&path).await
}

/// Patches mutable properties of a user by object id.
///
/// Only the fields present in `update` are sent, so everything else is
/// left untouched server-side. Graph replies `204 No Content`.
///
/// # Errors
///
/// - `GraphError::Api` — non-success status (404 unknown id, 400 invalid
///   property value).
/// - `GraphError::Auth` — token acquisition or refresh failed.
/// - `GraphError::Network` — transport-level failure.
pub async fn update_user(
    client: &GraphClient,
    user_id: &str,
    update: &UpdateUser,
) -> crate::error::Result<()> {
    let path = format!("users/{user_id}");
    client.patch(&path, update).await
}

/// Resolves a display name to a user by scanning the first page of results.
///
/// Returns the first user whose display name matches `display_name`
/// exactly, or `None` if the page contains no match. Display names are not
/// unique; when duplicates exist, the first match in server sort order wins.
/// That mirrors the demo's historical behavior — callers needing precise
/// addressing should use object ids directly.
///
/// Only the first page (25 users) is scanned, consistent with
/// [`list_users`] never following the continuation link.
///
/// # Errors
///
/// Propagates any failure from [`list_users`]. A name with zero matches is
/// `Ok(None)`, not an error.
pub async fn find_user_by_name(
    client: &GraphClient,
    display_name: &str,
) -> crate::error::Result<Option<User>> {
    let page = list_users(client).await?;
    Ok(page
        .value
        .into_iter()
        .find(|user| user.display_name.as_deref() == Some(display_name)))
}

/// Deletes the first user whose display name matches exactly.
///
/// Returns `Ok(true)` if a matching user was found and deleted, `Ok(false)`
/// if no user on the first page matched. The zero-match case is a status,
/// not an error.
///
/// # Errors
///
/// Propagates lookup or deletion failures (`Api`, `Auth`, `Network`).
pub async fn delete_user_by_name(
    client: &GraphClient,
    display_name: &str,
) -> crate::error::Result<bool> {
    match find_user_by_name(client, display_name).await? {
        Some(user) => {
            debug!(user_id = %user.id, %display_name, "deleting user");
            delete_user(client, &user.id).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Applies `update` to the first user whose display name matches exactly.
///
/// Same resolution and `Ok(true)`/`Ok(false)` semantics as
/// [`delete_user_by_name`].
///
/// # Errors
///
/// Propagates lookup or patch failures (`Api`, `Auth`, `Network`).
pub async fn update_user_by_name(
    client: &GraphClient,
    display_name: &str,
    update: &UpdateUser,
) -> crate::error::Result<bool> {
    match find_user_by_name(client, display_name).await? {
        Some(user) => {
            debug!(user_id = %user.id, %display_name, "updating user");
            update_user(client, &user.id, update).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
