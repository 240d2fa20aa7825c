use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Refresh token (stored in `refreshtokens`, one row per user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub token: String,
    pub user_id: ObjectId,
    pub expiry_date: BsonDateTime,
}

/// Password reset token (stored in `resettokens`, deleted when used)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetToken {
    pub token: String,
    pub user_id: ObjectId,
    pub expiry_date: BsonDateTime,
}

impl RefreshToken {
    pub fn is_expired_at(&self, now: BsonDateTime) -> bool {
        self.expiry_date < now
    }
}

impl ResetToken {
    pub fn is_expired_at(&self, now: BsonDateTime) -> bool {
        self.expiry_date < now
    }
}
