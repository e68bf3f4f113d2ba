//! Courses offered by coaches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CourseId, SkillId, UserId};

/// Editable course fields, shared by creation and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    /// Skill the course is filed under.
    pub skill_id: SkillId,
    /// Course title.
    pub name: String,
    /// Course description.
    pub description: String,
    /// Start time.
    pub start_at: DateTime<Utc>,
    /// End time.
    pub end_at: DateTime<Utc>,
    /// Maximum number of active bookings.
    pub max_participants: u32,
    /// `https` link to the online meeting.
    pub meeting_url: String,
}

/// A scheduled course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course ID.
    pub id: CourseId,

    /// The coach's user ID (owner of the course).
    pub user_id: UserId,

    /// Skill the course is filed under.
    pub skill_id: SkillId,

    /// Course title.
    pub name: String,

    /// Course description.
    pub description: String,

    /// Start time.
    pub start_at: DateTime<Utc>,

    /// End time.
    pub end_at: DateTime<Utc>,

    /// Maximum number of active bookings.
    pub max_participants: u32,

    /// `https` link to the online meeting.
    pub meeting_url: String,

    /// When the course was created.
    pub created_at: DateTime<Utc>,

    /// When the course was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a course owned by `owner`.
    #[must_use]
    pub fn new(owner: UserId, draft: CourseDraft) -> Self {
        let now = Utc::now();
        Self {
            id: CourseId::generate(),
            user_id: owner,
            skill_id: draft.skill_id,
            name: draft.name,
            description: draft.description,
            start_at: draft.start_at,
            end_at: draft.end_at,
            max_participants: draft.max_participants,
            meeting_url: draft.meeting_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields.
    pub fn apply(&mut self, draft: CourseDraft) {
        self.skill_id = draft.skill_id;
        self.name = draft.name;
        self.description = draft.description;
        self.start_at = draft.start_at;
        self.end_at = draft.end_at;
        self.max_participants = draft.max_participants;
        self.meeting_url = draft.meeting_url;
        self.updated_at = Utc::now();
    }

    /// Whether `user_id` owns this course.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}
