//! Domain models for storefront.

use serde::{Deserialize, Serialize};

use juniper_core::UserId;

/// Session key constants.
///
/// Keys are namespaced to avoid collisions with other session data.
pub mod session_keys {
    /// The authenticated user (`CurrentUser`).
    pub const CURRENT_USER: &str = "auth.current_user";
}

/// The authenticated user stored in the session.
///
/// Written by the auth service at login; read by the `RequireAuth` extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The user's account ID.
    pub id: UserId,
}
