pub mod auth;
pub mod health;
pub mod mentorship;
pub mod metrics;
pub mod roles;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::utils::error::AppError;

/// Malformed JSON bodies answer with the usual `{success, error}` envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| {
            log::warn!("❌ Rejected JSON body: {}", err);
            AppError::bad_request(err.to_string()).into()
        })
}

/// Same envelope for query strings that fail to deserialize.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        log::warn!("❌ Rejected query string: {}", err);
        AppError::bad_request(err.to_string()).into()
    })
}
