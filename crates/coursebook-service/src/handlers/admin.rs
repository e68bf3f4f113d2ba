//! Coach-only endpoints: promotion and course management.

use std::sync::Arc;

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use validator::Validate;

use coursebook_core::validation::{as_non_negative_integer, is_invalid_string};
use coursebook_core::{Coach, Course, CourseDraft, CourseId, Role, SkillId, UserId};
use coursebook_store::StoreError;

use super::coaches::CoachView;
use super::courses::CourseView;
use crate::auth::CoachUser;
use crate::error::ApiError;
use crate::extract::{IdPath, ValidJson};
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;
use crate::validate::{https_link, not_blank, profile_image_url, timestamp, whole_u32};

const COURSE_NOT_FOUND: &str = "course not found";

/// Read a validated whole-number field as `u32`.
fn required_u32(value: Option<&Number>) -> Result<u32, ApiError> {
    value
        .and_then(as_non_negative_integer)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(ApiError::invalid_fields)
}

fn required_timestamp(value: Option<String>) -> Result<DateTime<Utc>, ApiError> {
    let value = value.ok_or_else(ApiError::invalid_fields)?;
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ApiError::invalid_fields())
}

// ============================================================================
// Promotion
// ============================================================================

/// Promotion request.
#[derive(Debug, Deserialize, Validate)]
pub struct PromoteRequest {
    /// Years of experience.
    #[validate(required, custom = "whole_u32")]
    pub experience_years: Option<Number>,
    /// Biography.
    #[validate(required, custom = "not_blank")]
    pub description: Option<String>,
    /// Optional `https` profile picture.
    #[validate(custom = "profile_image_url")]
    pub profile_image_url: Option<String>,
}

/// Promoted user fields.
#[derive(Debug, Serialize)]
pub struct PromotedUser {
    /// Display name.
    pub name: String,
    /// New role.
    pub role: Role,
}

/// Promotion response.
#[derive(Debug, Serialize)]
pub struct PromoteResponse {
    /// The promoted user.
    pub user: PromotedUser,
    /// The new coach profile.
    pub coach: CoachView,
}

/// Promote a `USER` to `COACH` and create their coach profile.
pub async fn promote_to_coach(
    State(state): State<Arc<AppState>>,
    caller: CoachUser,
    IdPath(user_id): IdPath<UserId>,
    ValidJson(body): ValidJson<PromoteRequest>,
) -> ApiResult<PromoteResponse> {
    let experience_years = required_u32(body.experience_years.as_ref())?;
    let description = body.description.ok_or_else(ApiError::invalid_fields)?;
    let profile_image_url = body
        .profile_image_url
        .filter(|url| !is_invalid_string(Some(url)));

    let coach = Coach::new(user_id, experience_years, description, profile_image_url);

    let user = state.store.promote_to_coach(&coach).map_err(|e| match e {
        StoreError::NotFound { .. } => ApiError::NotFound("user not found".into()),
        StoreError::Conflict(_) => {
            tracing::warn!(%user_id, "Promotion rejected: already a coach");
            ApiError::Conflict("user is already a coach".into())
        }
        other => other.into(),
    })?;

    tracing::info!(
        promoted_by = %caller.user.id,
        %user_id,
        coach_id = %coach.id,
        "User promoted to coach"
    );

    Ok(created(PromoteResponse {
        user: PromotedUser {
            name: user.name,
            role: user.role,
        },
        coach: coach.into(),
    }))
}

// ============================================================================
// Courses
// ============================================================================

/// Course create/update request.
#[derive(Debug, Deserialize, Validate)]
pub struct CourseRequest {
    /// Skill ID.
    #[validate(required, custom = "not_blank")]
    pub skill_id: Option<String>,
    /// Title.
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    /// Description.
    #[validate(required, custom = "not_blank")]
    pub description: Option<String>,
    /// RFC 3339 start time.
    #[validate(required, custom = "timestamp")]
    pub start_at: Option<String>,
    /// RFC 3339 end time.
    #[validate(required, custom = "timestamp")]
    pub end_at: Option<String>,
    /// Capacity.
    #[validate(required, custom = "whole_u32")]
    pub max_participants: Option<Number>,
    /// `https` meeting link.
    #[validate(required, custom = "https_link")]
    pub meeting_url: Option<String>,
}

impl CourseRequest {
    /// Convert the validated fields and resolve the skill.
    fn into_draft(self, state: &AppState) -> Result<CourseDraft, ApiError> {
        let (Some(skill_id), Some(name), Some(description), Some(meeting_url)) =
            (self.skill_id, self.name, self.description, self.meeting_url)
        else {
            return Err(ApiError::invalid_fields());
        };
        let start_at = required_timestamp(self.start_at)?;
        let end_at = required_timestamp(self.end_at)?;
        let max_participants = required_u32(self.max_participants.as_ref())?;

        if end_at <= start_at {
            return Err(ApiError::BadRequest("end_at must be after start_at".into()));
        }

        let skill_id = skill_id
            .trim()
            .parse::<SkillId>()
            .map_err(|_| ApiError::invalid_fields())?;
        if state.store.get_skill(&skill_id)?.is_none() {
            return Err(ApiError::NotFound("skill not found".into()));
        }

        Ok(CourseDraft {
            skill_id,
            name,
            description,
            start_at,
            end_at,
            max_participants,
            meeting_url,
        })
    }
}

/// Publish a course owned by the caller.
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    coach: CoachUser,
    ValidJson(body): ValidJson<CourseRequest>,
) -> ApiResult<CourseView> {
    let draft = body.into_draft(&state).map_err(|e| {
        tracing::warn!(user_id = %coach.user.id, error = %e, "Course rejected");
        e
    })?;

    let course = Course::new(coach.user.id, draft);
    state.store.create_course(&course)?;

    tracing::info!(user_id = %coach.user.id, course_id = %course.id, "Course created");

    Ok(created(course.into()))
}

/// Replace the editable fields of one of the caller's courses.
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    coach: CoachUser,
    IdPath(course_id): IdPath<CourseId>,
    ValidJson(body): ValidJson<CourseRequest>,
) -> ApiResult<CourseView> {
    let draft = body.into_draft(&state)?;

    let mut course = state
        .store
        .get_course(&course_id)?
        .filter(|c| c.is_owned_by(&coach.user.id))
        .ok_or_else(|| {
            tracing::warn!(user_id = %coach.user.id, %course_id, "Course not found for coach");
            ApiError::NotFound(COURSE_NOT_FOUND.into())
        })?;

    course.apply(draft);
    state.store.update_course(&course).map_err(|e| match e {
        StoreError::NotFound { .. } => ApiError::NotFound(COURSE_NOT_FOUND.into()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %coach.user.id, %course_id, "Course updated");

    Ok(ok(course.into()))
}
