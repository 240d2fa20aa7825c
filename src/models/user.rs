use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Student,
    Alumni,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "student",
            UserType::Alumni => "alumni",
            UserType::Admin => "admin",
        }
    }
}

/// User document (stored in the `users` collection)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expertise_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

impl User {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn is_alumni(&self) -> bool {
        self.user_type == UserType::Alumni
    }
}

/// Fields written when a user becomes an alumnus.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlumniProfile {
    #[validate(range(min = 1900, max = 2100, message = "must be a plausible year"))]
    pub graduation_year: i32,
    #[validate(length(min = 1, message = "is required"))]
    pub field: String,
    #[serde(default)]
    pub expertise_areas: Vec<String>,
    #[serde(default)]
    pub current_position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub experience: String,
}

/// Filters accepted by the alumni directory.
#[derive(Debug, Clone, Default)]
pub struct AlumniFilter {
    pub field: Option<String>,
    pub expertise_areas: Vec<String>,
    pub graduation_year: Option<i32>,
}

impl AlumniFilter {
    /// Same predicate the MongoDB query expresses.
    pub fn matches(&self, user: &User) -> bool {
        user.is_alumni()
            && self.field.as_ref().map_or(true, |f| user.field.as_ref() == Some(f))
            && (self.expertise_areas.is_empty()
                || user
                    .expertise_areas
                    .iter()
                    .any(|area| self.expertise_areas.contains(area)))
            && self
                .graduation_year
                .map_or(true, |year| user.graduation_year == Some(year))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub skip: u64,
    pub limit: Option<i64>,
}

/// User as returned by the API: never carries the password.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expertise_areas: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id_hex(),
            name: user.name,
            email: user.email,
            user_type: user.user_type,
            role_id: user.role_id.map(|id| id.to_hex()),
            graduation_year: user.graduation_year,
            field: user.field,
            expertise_areas: user.expertise_areas,
            current_position: user.current_position,
            company: user.company,
            experience: user.experience,
            created_at: user.created_at.map(format_date),
            updated_at: user.updated_at.map(format_date),
        }
    }
}

pub fn format_date(date: BsonDateTime) -> String {
    date.try_to_rfc3339_string()
        .unwrap_or_else(|_| date.timestamp_millis().to_string())
}
