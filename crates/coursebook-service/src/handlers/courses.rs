//! Course catalog, booking and cancellation.

use std::sync::Arc;

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;

use coursebook_core::{Course, CourseBooking, CourseId, SkillId, UserId};
use coursebook_store::StoreError;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::IdPath;
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;

/// A stored course, as returned to its coach.
#[derive(Debug, Serialize)]
pub struct CourseView {
    /// Course ID.
    pub id: CourseId,
    /// Owning coach's user ID.
    pub user_id: UserId,
    /// Skill the course is filed under.
    pub skill_id: SkillId,
    /// Title.
    pub name: String,
    /// Description.
    pub description: String,
    /// Start time.
    pub start_at: DateTime<Utc>,
    /// End time.
    pub end_at: DateTime<Utc>,
    /// Capacity.
    pub max_participants: u32,
    /// Meeting link.
    pub meeting_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<Course> for CourseView {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            skill_id: c.skill_id,
            name: c.name,
            description: c.description,
            start_at: c.start_at,
            end_at: c.end_at,
            max_participants: c.max_participants,
            meeting_url: c.meeting_url,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// A course in the public catalog.
#[derive(Debug, Serialize)]
pub struct CourseListing {
    /// Course ID.
    pub id: CourseId,
    /// Title.
    pub name: String,
    /// Description.
    pub description: String,
    /// Start time.
    pub start_at: DateTime<Utc>,
    /// End time.
    pub end_at: DateTime<Utc>,
    /// Capacity.
    pub max_participants: u32,
    /// Coach's display name.
    pub coach_name: Option<String>,
    /// Skill name; `None` once the skill is deleted.
    pub skill_name: Option<String>,
}

/// List all courses with coach and skill names.
pub async fn list_courses(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CourseListing>> {
    let courses = state.store.list_courses()?;

    let mut listings = Vec::with_capacity(courses.len());
    for course in courses {
        let coach_name = state.store.get_user(&course.user_id)?.map(|u| u.name);
        let skill_name = state.store.get_skill(&course.skill_id)?.map(|s| s.name);
        listings.push(CourseListing {
            id: course.id,
            name: course.name,
            description: course.description,
            start_at: course.start_at,
            end_at: course.end_at,
            max_participants: course.max_participants,
            coach_name,
            skill_name,
        });
    }

    Ok(ok(listings))
}

/// Book a seat on a course, spending one credit.
pub async fn book_course(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    IdPath(course_id): IdPath<CourseId>,
) -> ApiResult<()> {
    let booking = CourseBooking::new(auth.user.id, course_id);

    let ledger = state.store.book_course(&booking).map_err(|e| {
        tracing::debug!(user_id = %auth.user.id, %course_id, error = %e, "Booking refused");
        ApiError::from(e)
    })?;

    tracing::info!(
        user_id = %auth.user.id,
        %course_id,
        booking_id = %booking.id,
        seats_taken = ledger.course_bookings + 1,
        max_participants = ledger.max_participants,
        "Course booked"
    );

    Ok(created(()))
}

/// Cancel the caller's active booking on a course.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    IdPath(course_id): IdPath<CourseId>,
) -> ApiResult<()> {
    let booking = state
        .store
        .cancel_booking(&auth.user.id, &course_id)
        .map_err(|e| match e {
            StoreError::NotFound { .. } => ApiError::NotFound("booking not found".into()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %auth.user.id, %course_id, booking_id = %booking.id, "Booking cancelled");

    Ok(ok(()))
}
