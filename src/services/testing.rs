//! Service fixtures backed by the in-memory repositories.

use chrono::Duration;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::config::{JwtSettings, MatchingSettings};
use crate::models::{User, UserType};
use crate::repositories::memory::{
    InMemoryCareerAdvice, InMemoryMentorships, InMemoryRoles, InMemoryTokens, InMemoryUsers,
};
use crate::repositories::UserRepository;
use crate::services::ai_service::testing::ScriptedModel;
use crate::services::ai_service::AiMatcher;
use crate::services::auth_service::AuthService;
use crate::services::jwt_service::JwtService;
use crate::services::mail_service::testing::RecordingMailer;
use crate::services::mentorship_service::MentorshipService;
use crate::services::roles_service::{RolesService, ADMIN_ROLE, USER_ROLE};

pub struct Harness {
    pub users: Arc<InMemoryUsers>,
    pub roles: Arc<InMemoryRoles>,
    pub tokens: Arc<InMemoryTokens>,
    pub mentorships: Arc<InMemoryMentorships>,
    pub advice: Arc<InMemoryCareerAdvice>,
    pub mailer: Arc<RecordingMailer>,
    pub jwt: JwtService,
    pub auth: Arc<AuthService>,
    pub roles_service: Arc<RolesService>,
    pub user_role: String,
    pub admin_role: String,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "test-secret".to_string(),
        access_ttl: Duration::hours(10),
        refresh_ttl: Duration::days(3),
    }
}

impl Harness {
    pub async fn new() -> Self {
        Self::build(RecordingMailer::default()).await
    }

    pub async fn with_failing_mailer() -> Self {
        Self::build(RecordingMailer::failing()).await
    }

    async fn build(mailer: RecordingMailer) -> Self {
        let users = Arc::new(InMemoryUsers::default());
        let roles = Arc::new(InMemoryRoles::default());
        let tokens = Arc::new(InMemoryTokens::default());
        let mailer = Arc::new(mailer);
        let settings = jwt_settings();

        let auth = Arc::new(AuthService::new(
            users.clone(),
            roles.clone(),
            tokens.clone(),
            mailer.clone(),
            &settings,
        ));
        let roles_service = Arc::new(RolesService::new(roles.clone()));
        roles_service.seed_default_roles().await.unwrap();

        let listed = roles_service.list_roles().await.unwrap();
        let role_id = |name: &str| {
            listed
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.id.clone())
                .unwrap()
        };
        let user_role = role_id(USER_ROLE);
        let admin_role = role_id(ADMIN_ROLE);

        Harness {
            users,
            roles,
            tokens,
            mentorships: Arc::new(InMemoryMentorships::default()),
            advice: Arc::new(InMemoryCareerAdvice::default()),
            mailer,
            jwt: JwtService::new(&settings),
            auth,
            roles_service,
            user_role,
            admin_role,
        }
    }

    pub fn mentorship(&self, model: Arc<ScriptedModel>, matching: MatchingSettings) -> MentorshipService {
        MentorshipService::new(
            self.mentorships.clone(),
            self.advice.clone(),
            self.auth.clone(),
            AiMatcher::new(model),
            matching,
        )
    }

    pub async fn insert_user(&self, name: &str, user_type: UserType, role_id: Option<&str>) -> User {
        self.users
            .insert(User {
                id: None,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password: "$2b$10$notarealhash".to_string(),
                user_type,
                role_id: role_id.map(|id| ObjectId::parse_str(id).unwrap()),
                graduation_year: None,
                field: None,
                expertise_areas: vec![],
                current_position: None,
                company: None,
                experience: None,
                created_at: None,
                updated_at: None,
            })
            .await
            .unwrap()
    }

    pub async fn insert_alumnus(&self, name: &str, year: i32, areas: &[&str]) -> User {
        self.users
            .insert(User {
                id: None,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password: "$2b$10$notarealhash".to_string(),
                user_type: UserType::Alumni,
                role_id: ObjectId::parse_str(&self.user_role).ok(),
                graduation_year: Some(year),
                field: Some("Engineering".to_string()),
                expertise_areas: areas.iter().map(|a| a.to_string()).collect(),
                current_position: Some("Engineer".to_string()),
                company: Some("Acme".to_string()),
                experience: Some("Several years".to_string()),
                created_at: None,
                updated_at: None,
            })
            .await
            .unwrap()
    }

    /// Reset mails go out on a spawned task; waits until `count` arrived.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<(String, String)> {
        for _ in 0..200 {
            let sent = self.mailer.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("expected {} reset mails, got {}", count, self.mailer.sent().len());
    }

    pub fn token_for(&self, user: &User) -> String {
        self.jwt.issue_access_token(&user.id_hex()).unwrap()
    }
}
