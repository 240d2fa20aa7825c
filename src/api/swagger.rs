use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alumni Mentorship Service API",
        version = "1.0.0",
        description = "Backend for the alumni mentorship platform.\n\n**Authentication:** everything outside `/auth` (except health and metrics) requires a JWT Bearer token.\n\n**Features:**\n- Email/password auth with refresh and reset tokens\n- Role based permissions\n- Alumni directory\n- AI ranked mentor matching\n- Career advice board"
    ),
    paths(
        // Auth
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::refresh_tokens,
        crate::api::auth::forgot_password,
        crate::api::auth::reset_password,
        crate::api::auth::change_password,
        crate::api::auth::get_me,
        crate::api::auth::get_permissions,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Roles
        crate::api::roles::create_role,
        crate::api::roles::list_roles,
        crate::api::roles::get_role,

        // Users
        crate::api::users::list_alumni,
        crate::api::users::get_user,
        crate::api::users::promote_to_alumni,

        // Mentorship
        crate::api::mentorship::create_request,
        crate::api::mentorship::find_matches,
        crate::api::mentorship::my_mentorships,
        crate::api::mentorship::create_career_advice,
        crate::api::mentorship::get_career_advice,
        crate::api::mentorship::like_career_advice,
        crate::api::mentorship::update_status,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::services::auth_service::RefreshTokenRequest,
            crate::services::auth_service::TokenPair,
            crate::services::auth_service::ChangePasswordRequest,
            crate::services::auth_service::ForgotPasswordRequest,
            crate::services::auth_service::ResetPasswordRequest,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Users & Roles
            crate::models::UserType,
            crate::models::UserResponse,
            crate::models::AlumniProfile,
            crate::models::Permission,
            crate::models::CreateRoleRequest,
            crate::models::RoleResponse,

            // Mentorship
            crate::models::MentorshipStatus,
            crate::models::CreateMentorshipRequest,
            crate::models::UpdateStatusRequest,
            crate::models::MentorshipResponse,
            crate::models::MentorMatch,
            crate::models::CreateCareerAdviceRequest,
            crate::models::AdviceAuthor,
            crate::models::CareerAdviceResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login, token refresh and password management."),
        (name = "Health", description = "Health check and counters for monitoring."),
        (name = "Roles", description = "Roles and the permissions they grant."),
        (name = "Users", description = "User lookup and the alumni directory."),
        (name = "Mentorship", description = "Mentorship requests, AI matching and the career advice board."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /auth/login"))
                        .build()
                ),
            );
        }
    }
}
