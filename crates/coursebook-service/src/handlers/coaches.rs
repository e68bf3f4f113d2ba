//! Public coach directory.

use std::sync::Arc;

use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursebook_core::validation::parse_positive_integer;
use coursebook_core::{Coach, CoachId, Role, UserId};

use crate::error::ApiError;
use crate::extract::IdPath;
use crate::response::{ok, ApiResult};
use crate::state::AppState;

/// Pagination query. Both values are required positive integers.
#[derive(Debug, Deserialize)]
pub struct ListCoachesQuery {
    /// Page size.
    pub per: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
}

/// One coach in the directory.
#[derive(Debug, Serialize)]
pub struct CoachSummary {
    /// Coach ID.
    pub id: CoachId,
    /// The coach's display name.
    pub name: String,
}

/// List coaches a page at a time.
pub async fn list_coaches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCoachesQuery>,
) -> ApiResult<Vec<CoachSummary>> {
    let (Some(per), Some(page)) = (
        parse_positive_integer(query.per.as_deref()),
        parse_positive_integer(query.page.as_deref()),
    ) else {
        tracing::warn!("Coach list rejected: bad pagination");
        return Err(ApiError::invalid_fields());
    };

    let limit = usize::try_from(per).map_err(|_| ApiError::invalid_fields())?;
    let offset = usize::try_from(per.saturating_mul(page - 1)).unwrap_or(usize::MAX);

    let coaches = state.store.list_coaches(limit, offset)?;

    let mut summaries = Vec::with_capacity(coaches.len());
    for coach in coaches {
        let Some(user) = state.store.get_user(&coach.user_id)? else {
            tracing::warn!(coach_id = %coach.id, "Coach without a user record");
            continue;
        };
        summaries.push(CoachSummary {
            id: coach.id,
            name: user.name,
        });
    }

    Ok(ok(summaries))
}

/// User fields shown with a coach profile.
#[derive(Debug, Serialize)]
pub struct CoachUserView {
    /// Display name.
    pub name: String,
    /// Role (always `COACH` for a promoted user).
    pub role: Role,
}

/// A coach profile.
#[derive(Debug, Serialize)]
pub struct CoachView {
    /// Coach ID.
    pub id: CoachId,
    /// The coach's user ID.
    pub user_id: UserId,
    /// Years of experience.
    pub experience_years: u32,
    /// Biography.
    pub description: String,
    /// Profile picture.
    pub profile_image_url: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last modified.
    pub updated_at: DateTime<Utc>,
}

impl From<Coach> for CoachView {
    fn from(coach: Coach) -> Self {
        Self {
            id: coach.id,
            user_id: coach.user_id,
            experience_years: coach.experience_years,
            description: coach.description,
            profile_image_url: coach.profile_image_url,
            created_at: coach.created_at,
            updated_at: coach.updated_at,
        }
    }
}

/// Coach profile with the owning user's name and role.
#[derive(Debug, Serialize)]
pub struct CoachDetail {
    /// User fields.
    pub user: CoachUserView,
    /// Coach profile.
    pub coach: CoachView,
}

/// Fetch one coach.
pub async fn get_coach(
    State(state): State<Arc<AppState>>,
    IdPath(coach_id): IdPath<CoachId>,
) -> ApiResult<CoachDetail> {
    let coach = state.store.get_coach(&coach_id)?.ok_or_else(|| {
        tracing::warn!(%coach_id, "Coach not found");
        ApiError::id_error()
    })?;

    let user = state
        .store
        .get_user(&coach.user_id)?
        .ok_or_else(|| ApiError::Internal(format!("coach {coach_id} has no user")))?;

    Ok(ok(CoachDetail {
        user: CoachUserView {
            name: user.name,
            role: user.role,
        },
        coach: coach.into(),
    }))
}
