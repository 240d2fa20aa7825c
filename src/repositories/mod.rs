//! Persistence ports. Each collection gets a trait so services can be built
//! against MongoDB in production and against in-memory stores in tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::models::{
    AlumniFilter, AlumniProfile, CareerAdvice, CareerAdviceFilter, Mentorship, MentorshipStatus,
    Pagination, RefreshToken, ResetToken, Role, User,
};
use crate::utils::error::AppError;

pub mod career_advice;
pub mod mentorships;
pub mod roles;
pub mod tokens;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use career_advice::MongoCareerAdviceRepository;
pub use mentorships::MongoMentorshipRepository;
pub use roles::MongoRoleRepository;
pub use tokens::MongoTokenRepository;
pub use users::MongoUserRepository;

pub const EMAIL_IN_USE: &str = "Email already in use";
pub const MENTORSHIP_EXISTS: &str = "Mentorship request already exists";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError>;

    /// Inserts a new user and returns it with its id. A taken email is a
    /// `BadRequest`.
    async fn insert(&self, user: User) -> Result<User, AppError>;

    /// Returns false when no user has that id.
    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> Result<bool, AppError>;

    async fn promote_to_alumni(
        &self,
        id: &ObjectId,
        profile: &AlumniProfile,
    ) -> Result<Option<User>, AppError>;

    /// Alumni matching `filter`, newest graduation year first.
    async fn find_alumni(
        &self,
        filter: &AlumniFilter,
        page: Pagination,
    ) -> Result<Vec<User>, AppError>;

    async fn count_alumni(&self, filter: &AlumniFilter) -> Result<u64, AppError>;
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn insert(&self, role: Role) -> Result<Role, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Role>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError>;

    async fn list(&self) -> Result<Vec<Role>, AppError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Replaces the user's refresh token (one row per user).
    async fn upsert_refresh_token(
        &self,
        user_id: &ObjectId,
        token: &str,
        expiry_date: BsonDateTime,
    ) -> Result<(), AppError>;

    /// The refresh token if it exists and has not expired at `now`.
    async fn find_valid_refresh_token(
        &self,
        token: &str,
        now: BsonDateTime,
    ) -> Result<Option<RefreshToken>, AppError>;

    async fn insert_reset_token(&self, token: ResetToken) -> Result<(), AppError>;

    /// Atomically removes and returns a reset token that has not expired at
    /// `now`. A second call with the same token returns `None`.
    async fn take_valid_reset_token(
        &self,
        token: &str,
        now: BsonDateTime,
    ) -> Result<Option<ResetToken>, AppError>;
}

#[async_trait]
pub trait MentorshipRepository: Send + Sync {
    /// Inserts a request. Fails with `BadRequest` when an open request for
    /// the same pair already exists, even if it was inserted concurrently.
    async fn insert(&self, mentorship: Mentorship) -> Result<Mentorship, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Mentorship>, AppError>;

    async fn find_open(
        &self,
        student_id: &ObjectId,
        alumni_id: &ObjectId,
    ) -> Result<Option<Mentorship>, AppError>;

    /// Moves `id` from `from` to `to`. Returns `None` when the stored status
    /// is no longer `from`.
    async fn update_status(
        &self,
        id: &ObjectId,
        from: MentorshipStatus,
        to: MentorshipStatus,
    ) -> Result<Option<Mentorship>, AppError>;

    /// Mentorships where the user is either party, newest first.
    async fn find_for_user(&self, user_id: &ObjectId) -> Result<Vec<Mentorship>, AppError>;
}

#[async_trait]
pub trait CareerAdviceRepository: Send + Sync {
    async fn insert(&self, advice: CareerAdvice) -> Result<CareerAdvice, AppError>;

    /// Posts matching `filter`, newest first.
    async fn find(&self, filter: &CareerAdviceFilter) -> Result<Vec<CareerAdvice>, AppError>;

    /// Adds `user_id` to the likers once. Returns the post, or `None` if it
    /// does not exist.
    async fn like(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<CareerAdvice>, AppError>;
}
