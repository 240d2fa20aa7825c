use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{format_date, User};

/// Career advice post (stored in the `careeradvices` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerAdvice {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub alumni_id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub ai_generated_summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub liked_by: Vec<ObjectId>,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateCareerAdviceRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "is required"))]
    pub content: String,
}

/// Query filters for the advice board.
#[derive(Debug, Clone, Default)]
pub struct CareerAdviceFilter {
    pub tags: Vec<String>,
    pub alumni_id: Option<ObjectId>,
    pub search: Option<String>,
}

impl CareerAdviceFilter {
    /// Same predicate the MongoDB query expresses.
    pub fn matches(&self, advice: &CareerAdvice) -> bool {
        let tags_ok = self.tags.is_empty() || advice.tags.iter().any(|t| self.tags.contains(t));
        let author_ok = self.alumni_id.map_or(true, |id| advice.alumni_id == id);
        let search_ok = self.search.as_ref().map_or(true, |needle| {
            let needle = needle.to_lowercase();
            advice.title.to_lowercase().contains(&needle)
                || advice.content.to_lowercase().contains(&needle)
        });
        tags_ok && author_ok && search_ok
    }
}

/// Author summary embedded in advice listings.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AdviceAuthor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for AdviceAuthor {
    fn from(user: &User) -> Self {
        AdviceAuthor {
            id: user.id_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CareerAdviceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub alumni_id: String,
    /// Populated author, absent when the author no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alumni: Option<AdviceAuthor>,
    pub title: String,
    pub content: String,
    pub ai_generated_summary: Option<String>,
    pub tags: Vec<String>,
    pub likes: i64,
    pub liked_by: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CareerAdviceResponse {
    pub fn new(advice: CareerAdvice, author: Option<AdviceAuthor>) -> Self {
        CareerAdviceResponse {
            id: advice.id.map(|id| id.to_hex()).unwrap_or_default(),
            alumni_id: advice.alumni_id.to_hex(),
            alumni: author,
            title: advice.title,
            content: advice.content,
            ai_generated_summary: advice.ai_generated_summary,
            tags: advice.tags,
            likes: advice.likes,
            liked_by: advice.liked_by.iter().map(|id| id.to_hex()).collect(),
            created_at: format_date(advice.created_at),
            updated_at: format_date(advice.updated_at),
        }
    }
}
