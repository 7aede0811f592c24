//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use teknokalakal_core::{Address, Email, UserId, UserRole, Username};

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The logged-in user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
}

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login handle.
    pub username: Username,
    /// Email address.
    pub email: Email,
    /// Account role; admins reach the `/admin` surface.
    pub role: UserRole,
    /// Delivery address, blank until the user fills their profile.
    pub address: Address,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The slice of a [`User`] kept in the session cookie store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether this session belongs to an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}
