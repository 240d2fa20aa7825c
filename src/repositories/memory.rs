//! In-memory repositories with the same guarantees as the MongoDB adapters
//! (unique email, one open mentorship per pair, single-use reset tokens).

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::*;
use crate::models::{AlumniProfile, UserType};

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| u.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::bad_request(EMAIL_IN_USE));
        }
        let now = BsonDateTime::now();
        user.id = Some(ObjectId::new());
        user.created_at = Some(now);
        user.updated_at = Some(now);
        users.push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            Some(user) => {
                user.password = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn promote_to_alumni(
        &self,
        id: &ObjectId,
        profile: &AlumniProfile,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id.as_ref() == Some(id)).map(|user| {
            user.user_type = UserType::Alumni;
            user.graduation_year = Some(profile.graduation_year);
            user.field = Some(profile.field.clone());
            user.expertise_areas = profile.expertise_areas.clone();
            user.current_position = Some(profile.current_position.clone());
            user.company = Some(profile.company.clone());
            user.experience = Some(profile.experience.clone());
            user.clone()
        }))
    }

    async fn find_alumni(
        &self,
        filter: &AlumniFilter,
        page: Pagination,
    ) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().unwrap();
        let mut alumni: Vec<User> = users.iter().filter(|u| filter.matches(u)).cloned().collect();
        alumni.sort_by(|a, b| b.graduation_year.cmp(&a.graduation_year));

        let limit = page.limit.map_or(usize::MAX, |l| l.max(0) as usize);
        Ok(alumni.into_iter().skip(page.skip as usize).take(limit).collect())
    }

    async fn count_alumni(&self, filter: &AlumniFilter) -> Result<u64, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().filter(|u| filter.matches(u)).count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRoles {
    roles: Mutex<Vec<Role>>,
}

#[async_trait]
impl RoleRepository for InMemoryRoles {
    async fn insert(&self, mut role: Role) -> Result<Role, AppError> {
        role.id = Some(ObjectId::new());
        self.roles.lock().unwrap().push(role.clone());
        Ok(role)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Role>, AppError> {
        let roles = self.roles.lock().unwrap();
        Ok(roles.iter().find(|r| r.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let roles = self.roles.lock().unwrap();
        Ok(roles.iter().find(|r| r.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Role>, AppError> {
        let mut roles = self.roles.lock().unwrap().clone();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }
}

#[derive(Default)]
pub struct InMemoryTokens {
    refresh: Mutex<Vec<RefreshToken>>,
    reset: Mutex<Vec<ResetToken>>,
    fail_reset_inserts: AtomicBool,
}

impl InMemoryTokens {
    pub fn refresh_tokens_for(&self, user_id: &ObjectId) -> Vec<RefreshToken> {
        let refresh = self.refresh.lock().unwrap();
        refresh.iter().filter(|t| &t.user_id == user_id).cloned().collect()
    }

    pub fn reset_tokens(&self) -> Vec<ResetToken> {
        self.reset.lock().unwrap().clone()
    }

    /// Makes every later `insert_reset_token` fail like a dropped connection.
    pub fn fail_reset_inserts(&self) {
        self.fail_reset_inserts.store(true, Ordering::SeqCst);
    }

    /// Moves every refresh token's expiry into the past.
    pub fn expire_refresh_tokens(&self) {
        let past = BsonDateTime::from_millis(BsonDateTime::now().timestamp_millis() - 1_000);
        for token in self.refresh.lock().unwrap().iter_mut() {
            token.expiry_date = past;
        }
    }

    /// Moves every reset token's expiry into the past.
    pub fn expire_reset_tokens(&self) {
        let past = BsonDateTime::from_millis(BsonDateTime::now().timestamp_millis() - 1_000);
        for token in self.reset.lock().unwrap().iter_mut() {
            token.expiry_date = past;
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokens {
    async fn upsert_refresh_token(
        &self,
        user_id: &ObjectId,
        token: &str,
        expiry_date: BsonDateTime,
    ) -> Result<(), AppError> {
        let mut refresh = self.refresh.lock().unwrap();
        match refresh.iter_mut().find(|t| &t.user_id == user_id) {
            Some(existing) => {
                existing.token = token.to_string();
                existing.expiry_date = expiry_date;
            }
            None => refresh.push(RefreshToken {
                token: token.to_string(),
                user_id: *user_id,
                expiry_date,
            }),
        }
        Ok(())
    }

    async fn find_valid_refresh_token(
        &self,
        token: &str,
        now: BsonDateTime,
    ) -> Result<Option<RefreshToken>, AppError> {
        let refresh = self.refresh.lock().unwrap();
        Ok(refresh
            .iter()
            .find(|t| t.token == token && !t.is_expired_at(now))
            .cloned())
    }

    async fn insert_reset_token(&self, token: ResetToken) -> Result<(), AppError> {
        if self.fail_reset_inserts.load(Ordering::SeqCst) {
            return Err(AppError::internal("reset token store unavailable"));
        }
        self.reset.lock().unwrap().push(token);
        Ok(())
    }

    async fn take_valid_reset_token(
        &self,
        token: &str,
        now: BsonDateTime,
    ) -> Result<Option<ResetToken>, AppError> {
        let mut reset = self.reset.lock().unwrap();
        let position = reset
            .iter()
            .position(|t| t.token == token && !t.is_expired_at(now));
        Ok(position.map(|i| reset.remove(i)))
    }
}

#[derive(Default)]
pub struct InMemoryMentorships {
    mentorships: Mutex<Vec<Mentorship>>,
}

impl InMemoryMentorships {
    pub fn all(&self) -> Vec<Mentorship> {
        self.mentorships.lock().unwrap().clone()
    }
}

#[async_trait]
impl MentorshipRepository for InMemoryMentorships {
    async fn insert(&self, mut mentorship: Mentorship) -> Result<Mentorship, AppError> {
        let mut mentorships = self.mentorships.lock().unwrap();
        mentorship.open = mentorship.status.is_open();
        let clash = mentorships.iter().any(|m| {
            m.open
                && mentorship.open
                && m.student_id == mentorship.student_id
                && m.alumni_id == mentorship.alumni_id
        });
        if clash {
            return Err(AppError::bad_request(MENTORSHIP_EXISTS));
        }
        mentorship.id = Some(ObjectId::new());
        mentorships.push(mentorship.clone());
        Ok(mentorship)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Mentorship>, AppError> {
        let mentorships = self.mentorships.lock().unwrap();
        Ok(mentorships.iter().find(|m| m.id.as_ref() == Some(id)).cloned())
    }

    async fn find_open(
        &self,
        student_id: &ObjectId,
        alumni_id: &ObjectId,
    ) -> Result<Option<Mentorship>, AppError> {
        let mentorships = self.mentorships.lock().unwrap();
        Ok(mentorships
            .iter()
            .find(|m| {
                &m.student_id == student_id && &m.alumni_id == alumni_id && m.status.is_open()
            })
            .cloned())
    }

    async fn update_status(
        &self,
        id: &ObjectId,
        from: MentorshipStatus,
        to: MentorshipStatus,
    ) -> Result<Option<Mentorship>, AppError> {
        let mut mentorships = self.mentorships.lock().unwrap();
        Ok(mentorships
            .iter_mut()
            .find(|m| m.id.as_ref() == Some(id) && m.status == from)
            .map(|m| {
                m.status = to;
                m.open = to.is_open();
                m.updated_at = BsonDateTime::now();
                m.clone()
            }))
    }

    async fn find_for_user(&self, user_id: &ObjectId) -> Result<Vec<Mentorship>, AppError> {
        let mentorships = self.mentorships.lock().unwrap();
        let mut found: Vec<Mentorship> =
            mentorships.iter().filter(|m| m.involves(user_id)).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[derive(Default)]
pub struct InMemoryCareerAdvice {
    posts: Mutex<Vec<CareerAdvice>>,
}

#[async_trait]
impl CareerAdviceRepository for InMemoryCareerAdvice {
    async fn insert(&self, mut advice: CareerAdvice) -> Result<CareerAdvice, AppError> {
        advice.id = Some(ObjectId::new());
        self.posts.lock().unwrap().push(advice.clone());
        Ok(advice)
    }

    async fn find(&self, filter: &CareerAdviceFilter) -> Result<Vec<CareerAdvice>, AppError> {
        let posts = self.posts.lock().unwrap();
        // Later inserts count as newer when timestamps tie.
        let mut found: Vec<(usize, CareerAdvice)> = posts
            .iter()
            .enumerate()
            .filter(|(_, p)| filter.matches(p))
            .map(|(i, p)| (i, p.clone()))
            .collect();
        found.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(found.into_iter().map(|(_, p)| p).collect())
    }

    async fn like(
        &self,
        id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<Option<CareerAdvice>, AppError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.iter_mut().find(|p| p.id.as_ref() == Some(id)).map(|post| {
            if !post.liked_by.contains(user_id) {
                post.liked_by.push(*user_id);
                post.likes += 1;
            }
            post.clone()
        }))
    }
}
