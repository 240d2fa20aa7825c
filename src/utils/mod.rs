// Utility functions
pub mod error;
pub mod password;

pub use error::*;

use mongodb::bson::oid::ObjectId;

/// Parses a hex ObjectId, mapping a malformed value to `BadRequest(message)`.
pub fn parse_object_id(raw: &str, message: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::bad_request(message))
}

pub const INVALID_USER_ID: &str = "Invalid user ID format";
