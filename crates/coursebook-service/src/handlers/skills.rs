//! Skill tags.

use std::sync::Arc;

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use coursebook_core::{Skill, SkillId};
use coursebook_store::StoreError;

use crate::error::ApiError;
use crate::extract::{IdPath, ValidJson};
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;
use crate::validate::display_name;

/// A skill tag.
#[derive(Debug, Serialize)]
pub struct SkillView {
    /// Skill ID.
    pub id: SkillId,
    /// Unique name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Skill> for SkillView {
    fn from(s: Skill) -> Self {
        Self {
            id: s.id,
            name: s.name,
            created_at: s.created_at,
        }
    }
}

/// List skills.
pub async fn list_skills(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SkillView>> {
    let skills = state.store.list_skills()?;
    Ok(ok(skills.into_iter().map(SkillView::from).collect()))
}

/// Skill create request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSkillRequest {
    /// Unique name.
    #[validate(required, custom = "display_name")]
    pub name: Option<String>,
}

/// Add a skill.
pub async fn create_skill(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<CreateSkillRequest>,
) -> ApiResult<SkillView> {
    let skill = Skill::new(body.name.ok_or_else(ApiError::invalid_fields)?);

    state.store.create_skill(&skill).map_err(|e| match e {
        StoreError::Conflict(_) => ApiError::Conflict("duplicate data".into()),
        other => other.into(),
    })?;

    tracing::info!(skill_id = %skill.id, name = %skill.name, "Skill created");

    Ok(created(skill.into()))
}

/// Remove a skill.
pub async fn delete_skill(
    State(state): State<Arc<AppState>>,
    IdPath(skill_id): IdPath<SkillId>,
) -> ApiResult<()> {
    state.store.delete_skill(&skill_id)?;
    tracing::info!(%skill_id, "Skill deleted");
    Ok(ok(()))
}
