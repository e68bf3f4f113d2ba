//! Core types and utilities for coursebook.
//!
//! This crate provides the domain types shared by the store, the HTTP service
//! and the client:
//!
//! - **Identifiers**: `UserId`, `CoachId`, `SkillId`, `CourseId`,
//!   `CreditPackageId`, `PurchaseId`, `BookingId`
//! - **Members**: `User`, `Role`, `Coach`
//! - **Catalog**: `Skill`, `Course`, `CreditPackage`
//! - **Ledger**: `CreditPurchase`, `CourseBooking`, `CreditLedger`
//! - **Validation**: pure predicates for request fields
//!
//! # Credits
//!
//! **1 credit = 1 active booking.** A user's balance is the sum of
//! `purchased_credits` over their purchases minus their active bookings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod booking;
pub mod coach;
pub mod course;
pub mod credits;
pub mod ids;
pub mod skill;
pub mod user;
pub mod validation;

pub use booking::{BookingRejection, CourseBooking, CreditLedger};
pub use coach::Coach;
pub use course::{Course, CourseDraft};
pub use credits::{CreditPackage, CreditPurchase};
pub use ids::{BookingId, CoachId, CourseId, CreditPackageId, IdError, PurchaseId, SkillId, UserId};
pub use skill::Skill;
pub use user::{Role, User};
