//! Request and response types for the coursebook client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursebook_core::{
    BookingId, CoachId, CourseId, CreditPackageId, PurchaseId, Role, SkillId, UserId,
};

/// Success envelope: `{"status":"success","data":...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct SuccessEnvelope<T> {
    pub data: T,
}

/// Failure envelope: `{"status":"failed"|"error","message":...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct FailureEnvelope {
    pub message: String,
}

// ============================================================================
// Members
// ============================================================================

/// Signup request.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// A newly created member.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupUser {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// Signup response.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    /// The created member.
    pub user: SignupUser,
}

/// Login request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Name returned at login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    /// Display name.
    pub name: String,
}

/// Login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// The logged-in member.
    pub user: LoginUser,
}

/// Profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub user: Profile,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct NameBody {
    pub name: String,
}

/// One purchase in the caller's history.
#[derive(Debug, Clone, Deserialize)]
pub struct Purchase {
    /// Purchase ID.
    pub id: PurchaseId,
    /// Package bought.
    pub credit_package_id: CreditPackageId,
    /// Credits granted.
    pub purchased_credits: u32,
    /// Price paid.
    pub price_paid: u64,
    /// When the purchase happened.
    pub purchase_at: DateTime<Utc>,
}

/// The caller's credit balance and purchases.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditSummary {
    /// Sum of purchased credits.
    pub total_credits: u64,
    /// Credits held by active bookings.
    pub used_credits: u64,
    /// Credits still available.
    pub remaining_credits: u64,
    /// Purchases, oldest first.
    pub purchases: Vec<Purchase>,
}

/// One booking in the caller's history.
#[derive(Debug, Clone, Deserialize)]
pub struct Booking {
    /// Booking ID.
    pub id: BookingId,
    /// Booked course.
    pub course_id: CourseId,
    /// Course title, if the course still exists.
    pub course_name: Option<String>,
    /// When the booking was made.
    pub booking_at: DateTime<Utc>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// `"active"` or `"cancelled"`.
    pub status: String,
}

// ============================================================================
// Coaches
// ============================================================================

/// One coach in the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct CoachSummary {
    /// Coach ID.
    pub id: CoachId,
    /// Display name.
    pub name: String,
}

/// User fields shown with a coach.
#[derive(Debug, Clone, Deserialize)]
pub struct CoachUser {
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
}

/// A coach profile.
#[derive(Debug, Clone, Deserialize)]
pub struct CoachProfile {
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
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A coach with the owning user's name and role.
///
/// Returned by both the coach detail and the promotion endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CoachDetail {
    /// User fields.
    pub user: CoachUser,
    /// Coach profile.
    pub coach: CoachProfile,
}

/// Promotion request.
#[derive(Debug, Clone, Serialize)]
pub struct PromoteRequest {
    /// Years of experience.
    pub experience_years: u32,
    /// Biography.
    pub description: String,
    /// Optional `https` profile picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

// ============================================================================
// Courses
// ============================================================================

/// Course create/update request.
#[derive(Debug, Clone, Serialize)]
pub struct CourseInput {
    /// Skill ID.
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
    /// `https` meeting link.
    pub meeting_url: String,
}

/// A course as returned to its coach.
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    /// Course ID.
    pub id: CourseId,
    /// Owning coach's user ID.
    pub user_id: UserId,
    /// Skill ID.
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
}

/// A course in the public catalog.
#[derive(Debug, Clone, Deserialize)]
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
    /// Skill name.
    pub skill_name: Option<String>,
}

// ============================================================================
// Catalog
// ============================================================================

/// A credit package.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditPackage {
    /// Package ID.
    pub id: CreditPackageId,
    /// Name.
    pub name: String,
    /// Credits granted per purchase.
    pub credit_amount: u32,
    /// Price per purchase.
    pub price: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePackageRequest<'a> {
    pub name: &'a str,
    pub credit_amount: u32,
    pub price: u64,
}

/// A skill tag.
#[derive(Debug, Clone, Deserialize)]
pub struct Skill {
    /// Skill ID.
    pub id: SkillId,
    /// Name.
    pub name: String,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}
