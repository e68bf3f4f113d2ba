//! Key encoding utilities for `RocksDB`.
//!
//! Primary keys are the raw 16 id bytes. Ledger indexes concatenate the
//! owner's UUID with the row's ULID, so a prefix scan over an owner yields its
//! rows in creation order.

use coursebook_core::{BookingId, CourseId, PurchaseId, UserId};

/// Length of an owner-prefixed index key.
pub const INDEX_KEY_LEN: usize = 32;

/// Key of a name index entry (emails are case-folded by the caller).
#[must_use]
pub fn name_key(name: &str) -> Vec<u8> {
    name.as_bytes().to_vec()
}

/// Normalize an email for the uniqueness index.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.trim().to_lowercase().into_bytes()
}

/// Create a user-purchase index key.
///
/// Format: `user_id (16 bytes) || purchase_id (16 bytes)`
#[must_use]
pub fn user_purchase_key(user_id: &UserId, purchase_id: &PurchaseId) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_KEY_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&purchase_id.to_bytes());
    key
}

/// Create a user-booking index key.
///
/// Format: `user_id (16 bytes) || booking_id (16 bytes)`
#[must_use]
pub fn user_booking_key(user_id: &UserId, booking_id: &BookingId) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_KEY_LEN);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&booking_id.to_bytes());
    key
}

/// Create a course-booking index key.
///
/// Format: `course_id (16 bytes) || booking_id (16 bytes)`
#[must_use]
pub fn course_booking_key(course_id: &CourseId, booking_id: &BookingId) -> Vec<u8> {
    let mut key = Vec::with_capacity(INDEX_KEY_LEN);
    key.extend_from_slice(course_id.as_bytes());
    key.extend_from_slice(&booking_id.to_bytes());
    key
}

/// Extract the trailing 16-byte ULID from an owner-prefixed index key.
///
/// Returns `None` if the key has the wrong length.
#[must_use]
pub fn index_suffix(key: &[u8]) -> Option<[u8; 16]> {
    if key.len() != INDEX_KEY_LEN {
        return None;
    }
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..INDEX_KEY_LEN]);
    Some(bytes)
}
