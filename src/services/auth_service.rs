use chrono::Utc;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::JwtSettings;
use crate::models::{
    AlumniFilter, AlumniProfile, Pagination, Permission, ResetToken, User, UserResponse, UserType,
};
use crate::repositories::{RoleRepository, TokenRepository, UserRepository, EMAIL_IN_USE};
use crate::services::jwt_service::JwtService;
use crate::services::mail_service::MailSender;
use crate::utils::error::AppError;
use crate::utils::password::{hash_password, random_token, verify_password};
use crate::utils::{parse_object_id, INVALID_USER_ID};

const WRONG_CREDENTIALS: &str = "Wrong credentials";
const RESET_TOKEN_LENGTH: usize = 64;
pub const FORGOT_PASSWORD_MESSAGE: &str = "If this user exists, they will receive an email";

fn expires_in(ttl: chrono::Duration) -> BsonDateTime {
    BsonDateTime::from_millis((Utc::now() + ttl).timestamp_millis())
}

// Request/Response structures
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "is required"))]
    pub name: String,
    pub role_id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub new_password: String,
    pub reset_token: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Accounts, credentials and permission lookups.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    tokens: Arc<dyn TokenRepository>,
    mailer: Arc<dyn MailSender>,
    jwt: JwtService,
    refresh_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        tokens: Arc<dyn TokenRepository>,
        mailer: Arc<dyn MailSender>,
        jwt_settings: &JwtSettings,
    ) -> Self {
        Self {
            users,
            roles,
            tokens,
            mailer,
            jwt: JwtService::new(jwt_settings),
            refresh_ttl: jwt_settings.refresh_ttl,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::bad_request(EMAIL_IN_USE));
        }

        let role_id = parse_object_id(&request.role_id, "Invalid roleId")?;
        if self.roles.find_by_id(&role_id).await?.is_none() {
            return Err(AppError::bad_request("Role not found"));
        }

        let password = hash_password(&request.password).await?;
        let user = User {
            id: None,
            name: request.name,
            email: request.email,
            password,
            user_type: UserType::Student,
            role_id: Some(role_id),
            graduation_year: None,
            field: None,
            expertise_areas: vec![],
            current_position: None,
            company: None,
            experience: None,
            created_at: None,
            updated_at: None,
        };

        // The unique index still catches a concurrent signup with the same email.
        let created = self.users.insert(user).await?;
        log::info!("✅ User created: {}", created.id_hex());
        Ok(created.into())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::unauthorized(WRONG_CREDENTIALS))?;

        if !verify_password(&request.password, &user.password).await? {
            return Err(AppError::unauthorized(WRONG_CREDENTIALS));
        }

        let user_id = user
            .id
            .ok_or_else(|| AppError::internal("Stored user has no _id"))?;
        let tokens = self.issue_tokens(&user_id).await?;

        Ok(LoginResponse {
            user_id: user_id.to_hex(),
            tokens,
        })
    }

    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let stored = self
            .tokens
            .find_valid_refresh_token(refresh_token, BsonDateTime::now())
            .await?
            .ok_or_else(|| AppError::unauthorized("Refresh Token is invalid"))?;

        self.issue_tokens(&stored.user_id).await
    }

    /// Signs an access token and replaces the user's refresh token.
    async fn issue_tokens(&self, user_id: &ObjectId) -> Result<TokenPair, AppError> {
        let access_token = self.jwt.issue_access_token(&user_id.to_hex())?;
        let refresh_token = Uuid::new_v4().to_string();

        let expiry = expires_in(self.refresh_ttl);
        self.tokens
            .upsert_refresh_token(user_id, &refresh_token, expiry)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        request.validate()?;
        let id = parse_object_id(user_id, INVALID_USER_ID)?;
        let user = self
            .users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !verify_password(&request.old_password, &user.password).await? {
            return Err(AppError::unauthorized(WRONG_CREDENTIALS));
        }

        let hashed = hash_password(&request.new_password).await?;
        self.users.update_password(&id, &hashed).await?;
        log::info!("🔑 Password changed for user {}", user_id);
        Ok(())
    }

    /// Same response whether or not the email belongs to an account.
    pub async fn forgot_password(&self, email: &str) -> Result<&'static str, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(FORGOT_PASSWORD_MESSAGE);
        };
        let Some(user_id) = user.id else {
            return Ok(FORGOT_PASSWORD_MESSAGE);
        };

        let token = random_token(RESET_TOKEN_LENGTH);
        let stored = self
            .tokens
            .insert_reset_token(ResetToken {
                token: token.clone(),
                user_id,
                expiry_date: expires_in(chrono::Duration::hours(1)),
            })
            .await;
        if let Err(e) = stored {
            log::error!("❌ Failed to store reset token for user {}: {}", user_id, e);
            return Ok(FORGOT_PASSWORD_MESSAGE);
        }

        // Sent off the request path; failures are only logged.
        let mailer = self.mailer.clone();
        let email = email.to_string();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_password_reset(&email, &token).await {
                log::error!("❌ Failed to send reset email for user {}: {}", user_id, e);
            }
        });

        Ok(FORGOT_PASSWORD_MESSAGE)
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let token = self
            .tokens
            .take_valid_reset_token(&request.reset_token, BsonDateTime::now())
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid link"))?;

        let hashed = hash_password(&request.new_password).await?;
        if !self.users.update_password(&token.user_id, &hashed).await? {
            return Err(AppError::internal(format!(
                "Reset token owner {} no longer exists",
                token.user_id
            )));
        }
        Ok(())
    }

    pub async fn get_user_permissions(&self, user_id: &str) -> Result<Vec<Permission>, AppError> {
        let user_id = parse_object_id(user_id, INVALID_USER_ID)?;
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))?;

        let role = match user.role_id {
            Some(role_id) => self.roles.find_by_id(&role_id).await?,
            None => None,
        };
        role.map(|r| r.permissions)
            .ok_or_else(|| AppError::forbidden("Role not found"))
    }

    pub async fn has_permission(
        &self,
        user_id: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, AppError> {
        let permissions = self.get_user_permissions(user_id).await?;
        Ok(permissions.iter().any(|p| p.allows(resource, action)))
    }

    /// Fails with `Forbidden` unless the user's role grants `action` on `resource`.
    pub async fn require_permission(
        &self,
        user_id: &str,
        resource: &str,
        action: &str,
    ) -> Result<(), AppError> {
        if self.has_permission(user_id, resource, action).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Missing permission {}:{}",
                resource, action
            )))
        }
    }

    /// Loads the full user record, including the password hash.
    pub(crate) async fn require_user(&self, user_id: &str) -> Result<User, AppError> {
        let id = parse_object_id(user_id, INVALID_USER_ID)?;
        self.users
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<UserResponse, AppError> {
        Ok(self.require_user(user_id).await?.into())
    }

    pub async fn find_alumni(
        &self,
        filter: &AlumniFilter,
        page: Pagination,
    ) -> Result<Vec<UserResponse>, AppError> {
        let alumni = self.users.find_alumni(filter, page).await?;
        Ok(alumni.into_iter().map(UserResponse::from).collect())
    }

    /// Same filters as [`AuthService::find_alumni`] but returns full records.
    pub(crate) async fn find_alumni_records(
        &self,
        filter: &AlumniFilter,
    ) -> Result<Vec<User>, AppError> {
        self.users.find_alumni(filter, Pagination::default()).await
    }

    pub(crate) async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        self.users.find_by_ids(ids).await
    }

    pub async fn count_alumni(&self, filter: &AlumniFilter) -> Result<u64, AppError> {
        self.users.count_alumni(filter).await
    }

    pub async fn promote_to_alumni(
        &self,
        user_id: &str,
        profile: AlumniProfile,
    ) -> Result<UserResponse, AppError> {
        profile.validate()?;
        let id = parse_object_id(user_id, INVALID_USER_ID)?;

        let user = self
            .users
            .promote_to_alumni(&id, &profile)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        log::info!("🎓 User {} promoted to alumni", user_id);
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Harness;

    fn signup_request(email: &str, role_id: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: "secret1".to_string(),
            name: "Sam".to_string(),
            role_id: role_id.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_returns_user_without_password() {
        let h = Harness::new().await;
        let user = h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        assert_eq!(user.email, "sam@example.com");
        assert_eq!(user.user_type, UserType::Student);
        assert_eq!(user.role_id.as_deref(), Some(h.user_role.as_str()));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());

        let stored = h.users.find_by_email("sam@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password, "secret1");
    }

    #[tokio::test]
    async fn test_signup_with_taken_email_fails() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        for _ in 0..2 {
            let err = h
                .auth
                .signup(signup_request("sam@example.com", &h.user_role))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m == "Email already in use"));
        }
    }

    #[tokio::test]
    async fn test_signup_role_checks() {
        let h = Harness::new().await;

        let err = h.auth.signup(signup_request("a@example.com", "nope")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid roleId");

        let missing = ObjectId::new().to_hex();
        let err = h.auth.signup(signup_request("a@example.com", &missing)).await.unwrap_err();
        assert_eq!(err.to_string(), "Role not found");
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let h = Harness::new().await;
        let mut request = signup_request("not-an-email", &h.user_role);
        request.password = "123".to_string();

        let err = h.auth.signup(request).await.unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(message.contains("email"));
        assert!(message.contains("password"));
    }

    #[tokio::test]
    async fn test_login_errors_are_indistinguishable() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        let wrong_password = h
            .auth
            .login(login_request("sam@example.com", "wrong-pass"))
            .await
            .unwrap_err();
        let unknown_email = h
            .auth
            .login(login_request("nobody@example.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
        assert!(matches!(unknown_email, AppError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_tokens() {
        let h = Harness::new().await;
        let user = h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        let login = h.auth.login(login_request("sam@example.com", "secret1")).await.unwrap();
        assert_eq!(login.user_id, user.id);

        let claims = h.jwt.verify(&login.tokens.access_token).unwrap();
        assert_eq!(claims.user_id, user.id);

        let oid = ObjectId::parse_str(&user.id).unwrap();
        let stored = h.tokens.refresh_tokens_for(&oid);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].token, login.tokens.refresh_token);

        let json = serde_json::to_value(&login).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
    }

    #[tokio::test]
    async fn test_refresh_rotates_the_single_refresh_token() {
        let h = Harness::new().await;
        let user = h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();
        let login = h.auth.login(login_request("sam@example.com", "secret1")).await.unwrap();

        let refreshed = h.auth.refresh_tokens(&login.tokens.refresh_token).await.unwrap();
        assert_ne!(refreshed.refresh_token, login.tokens.refresh_token);

        let oid = ObjectId::parse_str(&user.id).unwrap();
        assert_eq!(h.tokens.refresh_tokens_for(&oid).len(), 1);

        let err = h.auth.refresh_tokens(&login.tokens.refresh_token).await.unwrap_err();
        assert_eq!(err.to_string(), "Refresh Token is invalid");
    }

    #[tokio::test]
    async fn test_expired_refresh_token_is_rejected() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();
        let login = h.auth.login(login_request("sam@example.com", "secret1")).await.unwrap();

        h.tokens.expire_refresh_tokens();
        let err = h.auth.refresh_tokens(&login.tokens.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Refresh Token is invalid"));
    }

    #[tokio::test]
    async fn test_change_password() {
        let h = Harness::new().await;
        let user = h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        let err = h
            .auth
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "wrong-pass".into(),
                    new_password: "newsecret".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        h.auth
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "secret1".into(),
                    new_password: "newsecret".into(),
                },
            )
            .await
            .unwrap();
        assert!(h.auth.login(login_request("sam@example.com", "newsecret")).await.is_ok());

        let err = h
            .auth
            .change_password(
                &ObjectId::new().to_hex(),
                ChangePasswordRequest {
                    old_password: "secret1".into(),
                    new_password: "newsecret".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_forgot_password_response_does_not_leak_accounts() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        let known = h.auth.forgot_password("sam@example.com").await.unwrap();
        let unknown = h.auth.forgot_password("nobody@example.com").await.unwrap();
        assert_eq!(known, unknown);
        assert_eq!(known, FORGOT_PASSWORD_MESSAGE);

        let sent = h.wait_for_mail(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "sam@example.com");
        assert_eq!(sent[0].1.len(), 64);
    }

    #[tokio::test]
    async fn test_forgot_password_survives_mail_failure() {
        let h = Harness::with_failing_mailer().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        let message = h.auth.forgot_password("sam@example.com").await.unwrap();
        assert_eq!(message, FORGOT_PASSWORD_MESSAGE);
        assert_eq!(h.tokens.reset_tokens().len(), 1);
    }

    #[tokio::test]
    async fn test_forgot_password_hides_token_store_failure() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();
        h.tokens.fail_reset_inserts();

        let message = h.auth.forgot_password("sam@example.com").await.unwrap();
        assert_eq!(message, FORGOT_PASSWORD_MESSAGE);
        assert!(h.tokens.reset_tokens().is_empty());
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();
        h.auth.forgot_password("sam@example.com").await.unwrap();
        let token = h.wait_for_mail(1).await[0].1.clone();

        let reset = |token: &str| ResetPasswordRequest {
            new_password: "brandnew".to_string(),
            reset_token: token.to_string(),
        };

        h.auth.reset_password(reset(&token)).await.unwrap();
        assert!(h.auth.login(login_request("sam@example.com", "brandnew")).await.is_ok());

        let err = h.auth.reset_password(reset(&token)).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid link"));
    }

    #[tokio::test]
    async fn test_expired_reset_token_is_rejected() {
        let h = Harness::new().await;
        h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();
        h.auth.forgot_password("sam@example.com").await.unwrap();
        h.tokens.expire_reset_tokens();

        let token = h.wait_for_mail(1).await[0].1.clone();
        let err = h
            .auth
            .reset_password(ResetPasswordRequest {
                new_password: "brandnew".to_string(),
                reset_token: token,
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid link");
    }

    #[tokio::test]
    async fn test_permissions() {
        let h = Harness::new().await;
        let user = h.auth.signup(signup_request("sam@example.com", &h.user_role)).await.unwrap();

        let permissions = h.auth.get_user_permissions(&user.id).await.unwrap();
        assert!(!permissions.is_empty());
        assert!(h.auth.has_permission(&user.id, "mentorships", "read").await.unwrap());
        assert!(!h.auth.has_permission(&user.id, "roles", "create").await.unwrap());
        assert!(matches!(
            h.auth.require_permission(&user.id, "roles", "create").await,
            Err(AppError::Forbidden(_))
        ));

        let err = h
            .auth
            .get_user_permissions(&ObjectId::new().to_hex())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn test_permissions_with_missing_role() {
        let h = Harness::new().await;
        let orphan = h.insert_user("orphan", UserType::Student, None).await;

        let err = h.auth.get_user_permissions(&orphan.id_hex()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m == "Role not found"));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let h = Harness::new().await;
        assert_eq!(
            h.auth.find_by_id("123").await.unwrap_err().to_string(),
            "Invalid user ID format"
        );
        assert!(matches!(
            h.auth.find_by_id(&ObjectId::new().to_hex()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_alumni_by_year_sorted_descending() {
        let h = Harness::new().await;
        h.insert_alumnus("Ada", 2020, &["rust"]).await;
        h.insert_alumnus("Grace", 2018, &["cobol"]).await;
        h.insert_alumnus("Linus", 2020, &["c"]).await;
        h.insert_user("Sam", UserType::Student, None).await;

        let filter = AlumniFilter {
            graduation_year: Some(2020),
            ..Default::default()
        };
        let alumni = h.auth.find_alumni(&filter, Pagination::default()).await.unwrap();
        assert_eq!(alumni.len(), 2);
        assert!(alumni.iter().all(|a| a.graduation_year == Some(2020)));
        assert_eq!(h.auth.count_alumni(&filter).await.unwrap(), 2);

        let everyone = h
            .auth
            .find_alumni(&AlumniFilter::default(), Pagination::default())
            .await
            .unwrap();
        let years: Vec<_> = everyone.iter().map(|a| a.graduation_year).collect();
        assert_eq!(years, vec![Some(2020), Some(2020), Some(2018)]);

        let page = h
            .auth
            .find_alumni(&AlumniFilter::default(), Pagination { skip: 2, limit: Some(5) })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Grace");
    }

    #[tokio::test]
    async fn test_promote_to_alumni() {
        let h = Harness::new().await;
        let student = h.insert_user("Sam", UserType::Student, None).await;

        let profile = AlumniProfile {
            graduation_year: 2021,
            field: "Engineering".to_string(),
            expertise_areas: vec!["rust".to_string()],
            current_position: "Engineer".to_string(),
            company: "Acme".to_string(),
            experience: "5 years".to_string(),
        };
        let promoted = h.auth.promote_to_alumni(&student.id_hex(), profile.clone()).await.unwrap();
        assert_eq!(promoted.user_type, UserType::Alumni);
        assert_eq!(promoted.graduation_year, Some(2021));

        assert!(matches!(
            h.auth.promote_to_alumni(&ObjectId::new().to_hex(), profile).await,
            Err(AppError::NotFound(_))
        ));
    }
}
