use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::user::{format_date, UserResponse};

/// Lifecycle of a mentorship.
///
/// ```text
/// pending ──► active ──► completed
///    │
///    └──────► rejected
/// ```
/// `completed` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MentorshipStatus {
    Pending,
    Active,
    Completed,
    Rejected,
}

impl MentorshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MentorshipStatus::Pending => "pending",
            MentorshipStatus::Active => "active",
            MentorshipStatus::Completed => "completed",
            MentorshipStatus::Rejected => "rejected",
        }
    }

    /// Pending and active requests block a new request for the same pair.
    pub fn is_open(&self) -> bool {
        matches!(self, MentorshipStatus::Pending | MentorshipStatus::Active)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn allowed_transitions(&self) -> &'static [MentorshipStatus] {
        match self {
            MentorshipStatus::Pending => &[MentorshipStatus::Active, MentorshipStatus::Rejected],
            MentorshipStatus::Active => &[MentorshipStatus::Completed],
            MentorshipStatus::Completed | MentorshipStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, next: MentorshipStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

impl fmt::Display for MentorshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mentorship document (stored in the `mentorships` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentorship {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub alumni_id: ObjectId,
    #[serde(default)]
    pub match_score: Option<u8>,
    #[serde(default)]
    pub match_reason: Option<String>,
    pub status: MentorshipStatus,
    #[serde(default)]
    pub student_goals: String,
    /// Mirrors `status.is_open()`; backs the unique partial index on the pair.
    #[serde(default)]
    pub open: bool,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl Mentorship {
    pub fn new_request(
        student_id: ObjectId,
        alumni_id: ObjectId,
        goals: &str,
        match_score: Option<u8>,
        match_reason: Option<String>,
    ) -> Self {
        let now = BsonDateTime::now();
        Mentorship {
            id: None,
            student_id,
            alumni_id,
            match_score,
            match_reason,
            status: MentorshipStatus::Pending,
            student_goals: goals.to_string(),
            open: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn involves(&self, user_id: &ObjectId) -> bool {
        &self.student_id == user_id || &self.alumni_id == user_id
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentorshipRequest {
    pub alumni_id: String,
    #[serde(default)]
    pub goals: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: MentorshipStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub alumni_id: String,
    pub match_score: Option<u8>,
    pub match_reason: Option<String>,
    pub status: MentorshipStatus,
    pub student_goals: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Mentorship> for MentorshipResponse {
    fn from(m: Mentorship) -> Self {
        MentorshipResponse {
            id: m.id.map(|id| id.to_hex()).unwrap_or_default(),
            student_id: m.student_id.to_hex(),
            alumni_id: m.alumni_id.to_hex(),
            match_score: m.match_score,
            match_reason: m.match_reason,
            status: m.status,
            student_goals: m.student_goals,
            created_at: format_date(m.created_at),
            updated_at: format_date(m.updated_at),
        }
    }
}

/// One ranked candidate mentor.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MentorMatch {
    pub alumni: UserResponse,
    pub match_score: Option<u8>,
    pub match_reason: Option<String>,
    /// Set when the analysis call failed or timed out.
    pub analysis_failed: bool,
}
