pub mod ai_service;
pub mod auth_service;
pub mod jwt_service;
pub mod mail_service;
pub mod mentorship_service;
pub mod roles_service;

#[cfg(test)]
pub mod testing;

pub use ai_service::{AiMatcher, GeminiClient};
pub use auth_service::AuthService;
pub use jwt_service::JwtService;
pub use mail_service::SmtpMailer;
pub use mentorship_service::MentorshipService;
pub use roles_service::RolesService;
