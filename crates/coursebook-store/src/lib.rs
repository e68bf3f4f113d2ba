//! `RocksDB` storage layer for coursebook.
//!
//! This crate provides persistent storage for users, coaches, the course
//! catalog and the credit/booking ledger using `RocksDB` with column families
//! for secondary indexes.
//!
//! # Architecture
//!
//! Records are CBOR-encoded and keyed by their id bytes. Uniqueness rules
//! (email, skill name, package name) are enforced through name index column
//! families. Purchases and bookings are additionally indexed by owner
//! (`owner_id || ulid`) so per-user and per-course scans come out in time
//! order.
//!
//! Every operation that checks a multi-row rule and then writes (signup,
//! promotion, booking, cancellation, purchase, deletes) runs under a single
//! store-wide write lock and commits through one `WriteBatch`, so concurrent
//! requests cannot both pass a check that only one of them should.
//!
//! # Example
//!
//! ```no_run
//! use coursebook_store::{RocksStore, Store};
//! use coursebook_core::User;
//!
//! let store = RocksStore::open("/tmp/coursebook-db").unwrap();
//!
//! let user = User::new("Alice".into(), "alice@example.com".into(), "hash".into());
//! store.create_user(&user).unwrap();
//!
//! let found = store.find_user_by_email("alice@example.com").unwrap();
//! assert!(found.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use coursebook_core::{
    Coach, CoachId, Course, CourseBooking, CourseId, CreditLedger, CreditPackage,
    CreditPackageId, CreditPurchase, Skill, SkillId, User, UserId,
};

/// The storage trait defining all database operations.
///
/// Handlers depend on this trait rather than on `RocksStore` directly, so the
/// storage handle is always passed in explicitly.
pub trait Store: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already registered.
    fn create_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Look a user up by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Change a user's display name and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn rename_user(&self, user_id: &UserId, name: &str) -> Result<User>;

    // =========================================================================
    // Coaches
    // =========================================================================

    /// Promote `coach.user_id` to the `COACH` role and insert the coach profile.
    ///
    /// Role change and profile insert are committed together.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::Conflict` if the user is already a coach.
    fn promote_to_coach(&self, coach: &Coach) -> Result<User>;

    /// Get a coach profile by coach ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_coach(&self, coach_id: &CoachId) -> Result<Option<Coach>>;

    /// Get the coach profile belonging to a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_coach_by_user(&self, user_id: &UserId) -> Result<Option<Coach>>;

    /// List coach profiles ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_coaches(&self, limit: usize, offset: usize) -> Result<Vec<Coach>>;

    // =========================================================================
    // Skills
    // =========================================================================

    /// Insert a new skill.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the name is taken.
    fn create_skill(&self, skill: &Skill) -> Result<()>;

    /// Get a skill by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_skill(&self, skill_id: &SkillId) -> Result<Option<Skill>>;

    /// List all skills ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_skills(&self) -> Result<Vec<Skill>>;

    /// Delete a skill.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the skill doesn't exist.
    fn delete_skill(&self, skill_id: &SkillId) -> Result<()>;

    // =========================================================================
    // Courses
    // =========================================================================

    /// Insert a new course.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_course(&self, course: &Course) -> Result<()>;

    /// Get a course by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_course(&self, course_id: &CourseId) -> Result<Option<Course>>;

    /// Overwrite an existing course.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the course doesn't exist.
    fn update_course(&self, course: &Course) -> Result<()>;

    /// List all courses ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_courses(&self) -> Result<Vec<Course>>;

    // =========================================================================
    // Credit packages and purchases
    // =========================================================================

    /// Insert a new credit package.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the name is taken.
    fn create_credit_package(&self, package: &CreditPackage) -> Result<()>;

    /// Get a credit package by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_credit_package(&self, package_id: &CreditPackageId) -> Result<Option<CreditPackage>>;

    /// List all credit packages ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_credit_packages(&self) -> Result<Vec<CreditPackage>>;

    /// Delete a credit package. Existing purchases are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the package doesn't exist.
    fn delete_credit_package(&self, package_id: &CreditPackageId) -> Result<()>;

    /// Record a purchase of a package at its current terms.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the package doesn't exist.
    fn purchase_credit_package(
        &self,
        user_id: &UserId,
        package_id: &CreditPackageId,
    ) -> Result<CreditPurchase>;

    /// List a user's purchases, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_purchases_by_user(&self, user_id: &UserId) -> Result<Vec<CreditPurchase>>;

    /// Sum of `purchased_credits` over a user's purchases (0 when none).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn total_purchased_credits(&self, user_id: &UserId) -> Result<u64>;

    // =========================================================================
    // Bookings
    // =========================================================================

    /// Get the user's active booking for a course, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_active_booking(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseBooking>>;

    /// Number of active bookings held by a user across all courses.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_active_bookings_by_user(&self, user_id: &UserId) -> Result<u64>;

    /// Number of active bookings on a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_active_bookings_by_course(&self, course_id: &CourseId) -> Result<u64>;

    /// List a user's bookings (active and cancelled), oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_bookings_by_user(&self, user_id: &UserId) -> Result<Vec<CourseBooking>>;

    /// Check the booking rules and insert the booking in one step.
    ///
    /// Returns the ledger the decision was based on.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the course doesn't exist.
    /// - `StoreError::AlreadyBooked` if the user already holds an active booking.
    /// - `StoreError::Rejected` if credits or seats are exhausted.
    fn book_course(&self, booking: &CourseBooking) -> Result<CreditLedger>;

    /// Cancel the user's active booking for a course and return it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if there is no active booking.
    fn cancel_booking(&self, user_id: &UserId, course_id: &CourseId) -> Result<CourseBooking>;
}
