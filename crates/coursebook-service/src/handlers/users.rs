//! Member account handlers: signup, login, profile and personal history.

use std::sync::Arc;

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use coursebook_core::{
    BookingId, CourseBooking, CourseId, CreditPackageId, CreditPurchase, PurchaseId, User, UserId,
};
use coursebook_store::StoreError;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::response::{created, ok, ApiResult};
use crate::state::AppState;
use crate::validate::{display_name, not_blank, strong_password};

const BAD_CREDENTIALS: &str = "user not found or wrong password";

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name.
    #[validate(required, custom = "display_name")]
    pub name: Option<String>,
    /// Login email.
    #[validate(required, custom = "not_blank", email(message = "email format is invalid"))]
    pub email: Option<String>,
    /// Plain-text password.
    #[validate(required, custom = "strong_password")]
    pub password: Option<String>,
}

/// Newly created member.
#[derive(Debug, Serialize)]
pub struct SignupUser {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

/// Signup response.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// The created member.
    pub user: SignupUser,
}

/// Register a new member with the `USER` role.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<SignupRequest>,
) -> ApiResult<SignupResponse> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(ApiError::invalid_fields());
    };

    if state.store.find_user_by_email(&email)?.is_some() {
        tracing::warn!("Signup rejected: email already in use");
        return Err(ApiError::Conflict("email already in use".into()));
    }

    let password_hash = hash_password(password, state.config.salt_rounds).await?;
    let user = User::new(name, email, password_hash);

    state.store.create_user(&user).map_err(|e| match e {
        StoreError::Conflict(_) => ApiError::Conflict("email already in use".into()),
        other => other.into(),
    })?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok(created(SignupResponse {
        user: SignupUser {
            id: user.id,
            name: user.name,
        },
    }))
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(required, custom = "not_blank", email(message = "email format is invalid"))]
    pub email: Option<String>,
    /// Plain-text password.
    #[validate(required, custom = "strong_password")]
    pub password: Option<String>,
}

/// Name shown after login.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    /// Display name.
    pub name: String,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// The logged-in member.
    pub user: LoginUser,
}

/// Exchange email and password for a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::invalid_fields());
    };

    let user = state
        .store
        .find_user_by_email(&email)?
        .ok_or_else(|| ApiError::BadRequest(BAD_CREDENTIALS.into()))?;

    if !verify_password(password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::BadRequest(BAD_CREDENTIALS.into()));
    }

    let token = state.tokens.issue(&user.id)?;

    Ok(ok(LoginResponse {
        token,
        user: LoginUser { name: user.name },
    }))
}

/// Profile fields.
#[derive(Debug, Serialize)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
}

/// Profile response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The caller's profile.
    pub user: Profile,
}

/// Fetch the caller's profile.
pub async fn get_profile(auth: AuthUser) -> ApiResult<ProfileResponse> {
    Ok(ok(ProfileResponse {
        user: Profile {
            name: auth.user.name,
            email: auth.user.email,
        },
    }))
}

/// Profile update request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(required, custom = "display_name")]
    pub name: Option<String>,
}

/// Profile update response.
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    /// The stored display name.
    pub name: String,
}

/// Rename the caller.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidJson(body): ValidJson<UpdateProfileRequest>,
) -> ApiResult<UpdateProfileResponse> {
    let name = body.name.ok_or_else(ApiError::invalid_fields)?;
    if name == auth.user.name {
        return Err(ApiError::BadRequest("name unchanged".into()));
    }

    let user = state.store.rename_user(&auth.user.id, &name)?;

    Ok(ok(UpdateProfileResponse { name: user.name }))
}

/// One purchase in the caller's history.
#[derive(Debug, Serialize)]
pub struct PurchaseView {
    /// Purchase ID.
    pub id: PurchaseId,
    /// Package bought (may since have been deleted).
    pub credit_package_id: CreditPackageId,
    /// Credits granted at purchase time.
    pub purchased_credits: u32,
    /// Price paid at purchase time.
    pub price_paid: u64,
    /// When the purchase happened.
    pub purchase_at: DateTime<Utc>,
}

impl From<CreditPurchase> for PurchaseView {
    fn from(p: CreditPurchase) -> Self {
        Self {
            id: p.id,
            credit_package_id: p.credit_package_id,
            purchased_credits: p.purchased_credits,
            price_paid: p.price_paid,
            purchase_at: p.purchase_at,
        }
    }
}

/// The caller's credit balance and purchases.
#[derive(Debug, Serialize)]
pub struct CreditSummary {
    /// Sum of purchased credits.
    pub total_credits: u64,
    /// Credits held by active bookings.
    pub used_credits: u64,
    /// Credits still available.
    pub remaining_credits: u64,
    /// Purchases, oldest first.
    pub purchases: Vec<PurchaseView>,
}

/// List the caller's purchases with their credit balance.
pub async fn list_purchases(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<CreditSummary> {
    let purchases = state.store.list_purchases_by_user(&auth.user.id)?;
    let total_credits = purchases
        .iter()
        .map(|p| u64::from(p.purchased_credits))
        .sum::<u64>();
    let used_credits = state.store.count_active_bookings_by_user(&auth.user.id)?;

    Ok(ok(CreditSummary {
        total_credits,
        used_credits,
        remaining_credits: total_credits.saturating_sub(used_credits),
        purchases: purchases.into_iter().map(PurchaseView::from).collect(),
    }))
}

/// One booking in the caller's history.
#[derive(Debug, Serialize)]
pub struct BookingView {
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
    pub status: &'static str,
}

/// List the caller's bookings, cancelled ones included.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Vec<BookingView>> {
    let bookings = state.store.list_bookings_by_user(&auth.user.id)?;

    let mut views = Vec::with_capacity(bookings.len());
    for booking in bookings {
        let course_name = state.store.get_course(&booking.course_id)?.map(|c| c.name);
        views.push(booking_view(booking, course_name));
    }

    Ok(ok(views))
}

fn booking_view(booking: CourseBooking, course_name: Option<String>) -> BookingView {
    let status = if booking.is_active() {
        "active"
    } else {
        "cancelled"
    };
    BookingView {
        id: booking.id,
        course_id: booking.course_id,
        course_name,
        booking_at: booking.booking_at,
        cancelled_at: booking.cancelled_at,
        status,
    }
}
