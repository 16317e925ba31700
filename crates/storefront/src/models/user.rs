//! User models.
//!
//! Users exist in the storage contract only — there is no authentication
//! surface. The password field is an opaque hash-at-rest string.

use serde::{Deserialize, Serialize};

use printforge_core::UserId;

/// A stored user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Opaque password hash. Never serialized back to clients by any route.
    pub password: String,
}

/// Fields for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl NewUser {
    /// Materialize a user with the given id.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
        }
    }
}
