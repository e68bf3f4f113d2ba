//! Course bookings and the credit/capacity policy.
//!
//! One booking consumes one credit while it is active. Cancelling sets
//! `cancelled_at` and returns the credit; bookings are never removed, so the
//! table doubles as a history of every reservation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BookingId, CourseId, UserId};

/// A reservation of a user against a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseBooking {
    /// Unique booking ID (ULID for time-ordering).
    pub id: BookingId,

    /// The booking user.
    pub user_id: UserId,

    /// The booked course.
    pub course_id: CourseId,

    /// When the booking was made.
    pub booking_at: DateTime<Utc>,

    /// When the booking was cancelled, if it was.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl CourseBooking {
    /// Create a new active booking.
    #[must_use]
    pub fn new(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            id: BookingId::generate(),
            user_id,
            course_id,
            booking_at: Utc::now(),
            cancelled_at: None,
        }
    }

    /// Whether the booking still holds a seat and a credit.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancelled_at.is_none()
    }

    /// Mark the booking cancelled at `at`.
    pub fn cancel(&mut self, at: DateTime<Utc>) {
        self.cancelled_at = Some(at);
    }
}

/// Why a booking request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookingRejection {
    /// Every purchased credit is already held by an active booking.
    #[error("no remaining credits")]
    NoRemainingCredits,

    /// The course has reached `max_participants` active bookings.
    #[error("course is full")]
    CourseFull,
}

/// Snapshot of the counters a booking decision depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditLedger {
    /// Sum of `purchased_credits` over all of the user's purchases.
    pub total_credits: u64,
    /// The user's active bookings across all courses.
    pub used_credits: u64,
    /// Active bookings on the requested course.
    pub course_bookings: u64,
    /// Capacity of the requested course.
    pub max_participants: u32,
}

impl CreditLedger {
    /// Credits the user can still spend.
    #[must_use]
    pub fn remaining_credits(&self) -> u64 {
        self.total_credits.saturating_sub(self.used_credits)
    }

    /// Decide whether one more booking fits. Credits are checked before capacity.
    ///
    /// # Errors
    ///
    /// Returns the first rule the booking would break.
    pub fn evaluate(&self) -> Result<(), BookingRejection> {
        if self.used_credits >= self.total_credits {
            return Err(BookingRejection::NoRemainingCredits);
        }
        if self.course_bookings >= u64::from(self.max_participants) {
            return Err(BookingRejection::CourseFull);
        }
        Ok(())
    }
}
