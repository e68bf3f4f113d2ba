//! Skill tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SkillId;

/// A skill tag that courses are filed under. Names are unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Unique skill ID.
    pub id: SkillId,
    /// Unique skill name.
    pub name: String,
    /// When the skill was created.
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Create a new skill.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: SkillId::generate(),
            name,
            created_at: Utc::now(),
        }
    }
}
