//! Coach profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoachId, UserId};

/// Extended profile of a user holding the `COACH` role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    /// Unique coach ID.
    pub id: CoachId,

    /// The promoted user. Never changes after creation.
    pub user_id: UserId,

    /// Years of coaching experience.
    pub experience_years: u32,

    /// Free-form biography.
    pub description: String,

    /// Optional `https` profile picture.
    pub profile_image_url: Option<String>,

    /// When the coach profile was created.
    pub created_at: DateTime<Utc>,

    /// When the coach profile was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Coach {
    /// Create a new coach profile for a user.
    #[must_use]
    pub fn new(
        user_id: UserId,
        experience_years: u32,
        description: String,
        profile_image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CoachId::generate(),
            user_id,
            experience_years,
            description,
            profile_image_url,
            created_at: now,
            updated_at: now,
        }
    }
}
