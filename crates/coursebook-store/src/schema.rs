//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: lowercase email to `user_id`.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Coach profiles, keyed by `coach_id`.
    pub const COACHES: &str = "coaches";

    /// Index: `user_id` to `coach_id`.
    pub const COACHES_BY_USER: &str = "coaches_by_user";

    /// Skill tags, keyed by `skill_id`.
    pub const SKILLS: &str = "skills";

    /// Index: skill name to `skill_id`.
    pub const SKILLS_BY_NAME: &str = "skills_by_name";

    /// Courses, keyed by `course_id`.
    pub const COURSES: &str = "courses";

    /// Credit packages, keyed by `credit_package_id`.
    pub const CREDIT_PACKAGES: &str = "credit_packages";

    /// Index: package name to `credit_package_id`.
    pub const CREDIT_PACKAGES_BY_NAME: &str = "credit_packages_by_name";

    /// Credit purchases, keyed by `purchase_id` (ULID).
    pub const CREDIT_PURCHASES: &str = "credit_purchases";

    /// Index: purchases by user, keyed by `user_id || purchase_id`.
    /// Value is empty (index only).
    pub const CREDIT_PURCHASES_BY_USER: &str = "credit_purchases_by_user";

    /// Course bookings, keyed by `booking_id` (ULID).
    pub const COURSE_BOOKINGS: &str = "course_bookings";

    /// Index: bookings by user, keyed by `user_id || booking_id`.
    pub const BOOKINGS_BY_USER: &str = "bookings_by_user";

    /// Index: bookings by course, keyed by `course_id || booking_id`.
    pub const BOOKINGS_BY_COURSE: &str = "bookings_by_course";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_EMAIL,
        cf::COACHES,
        cf::COACHES_BY_USER,
        cf::SKILLS,
        cf::SKILLS_BY_NAME,
        cf::COURSES,
        cf::CREDIT_PACKAGES,
        cf::CREDIT_PACKAGES_BY_NAME,
        cf::CREDIT_PURCHASES,
        cf::CREDIT_PURCHASES_BY_USER,
        cf::COURSE_BOOKINGS,
        cf::BOOKINGS_BY_USER,
        cf::BOOKINGS_BY_COURSE,
    ]
}
