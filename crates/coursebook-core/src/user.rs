//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular member who buys credits and books courses.
    User,
    /// Member promoted to coach; may create and edit courses.
    Coach,
}

impl Role {
    /// Wire name of the role (`"USER"` / `"COACH"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Coach => "COACH",
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Login email, unique across all users.
    pub email: String,

    /// bcrypt hash of the password.
    pub password_hash: String,

    /// Current role.
    pub role: Role,

    /// When the user signed up.
    pub created_at: DateTime<Utc>,

    /// When the user was last modified.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the `USER` role.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            name,
            email,
            password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user currently holds the `COACH` role.
    #[must_use]
    pub fn is_coach(&self) -> bool {
        self.role == Role::Coach
    }

    /// Flip the role to `COACH`.
    pub fn promote(&mut self) {
        self.role = Role::Coach;
        self.updated_at = Utc::now();
    }

    /// Replace the display name.
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}
