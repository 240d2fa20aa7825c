mod api;
mod config;
mod database;
mod middleware;
mod models;
mod repositories;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{dev::Service as _, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use futures::FutureExt;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::repositories::{
    MongoCareerAdviceRepository, MongoMentorshipRepository, MongoRoleRepository,
    MongoTokenRepository, MongoUserRepository,
};
use crate::services::{
    AiMatcher, AuthService, GeminiClient, JwtService, MentorshipService, RolesService, SmtpMailer,
};

fn startup_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    log::error!("❌ {}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    log::info!("🚀 Starting Alumni Mentorship Service...");
    log::info!("📊 Database: {}", settings.mongodb_database);

    let db = database::MongoDB::new(&settings.mongodb_uri, &settings.mongodb_database)
        .await
        .map_err(|e| startup_error("Failed to connect to MongoDB", e))?;
    log::info!("✅ MongoDB connected successfully");

    let users = Arc::new(MongoUserRepository::new(&db));
    let roles = Arc::new(MongoRoleRepository::new(&db));
    let tokens = Arc::new(MongoTokenRepository::new(&db));
    let mentorships = Arc::new(MongoMentorshipRepository::new(&db));
    let advice = Arc::new(MongoCareerAdviceRepository::new(&db));

    let mailer = SmtpMailer::new(&settings.mail, &settings.frontend_url)
        .map_err(|e| startup_error("Failed to build SMTP transport", e))?;
    let gemini = GeminiClient::new(&settings.gemini, settings.matching.call_timeout)
        .map_err(|e| startup_error("Failed to build Gemini client", e))?;

    let jwt = JwtService::new(&settings.jwt);
    let auth = Arc::new(AuthService::new(
        users,
        roles.clone(),
        tokens,
        Arc::new(mailer),
        &settings.jwt,
    ));
    let roles_service = Arc::new(RolesService::new(roles));
    let mentorship = Arc::new(MentorshipService::new(
        mentorships,
        advice,
        auth.clone(),
        AiMatcher::new(Arc::new(gemini)),
        settings.matching.clone(),
    ));

    seeds::roles_seed::seed_default_roles(&roles_service).await;

    let db_data = web::Data::new(db);
    let jwt_data = web::Data::new(jwt);
    let auth_data = web::Data::from(auth);
    let roles_data = web::Data::from(roles_service);
    let mentorship_data = web::Data::from(mentorship);
    let frontend_url = settings.frontend_url.clone();

    log::info!("🌐 Server starting on {}:{}", settings.host, settings.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", settings.host, settings.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", settings.host, settings.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(jwt_data.clone())
            .app_data(auth_data.clone())
            .app_data(roles_data.clone())
            .app_data(mentorship_data.clone())
            .app_data(api::json_config())
            .app_data(api::query_config())
            .wrap_fn(|req, srv| {
                api::metrics::increment_request_count();
                srv.call(req).map(|res| {
                    let failed = match &res {
                        Ok(res) => res.status().is_client_error() || res.status().is_server_error(),
                        Err(_) => true,
                    };
                    if failed {
                        api::metrics::increment_error_count();
                    }
                    res
                })
            })
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .route("/health", web::get().to(api::health::health_check))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Auth: public routes plus per-resource guards inside
            .service(web::scope("/auth").configure(api::auth::configure))
            .service(
                web::scope("/roles")
                    .wrap(middleware::AuthMiddleware)
                    .configure(api::roles::configure),
            )
            .service(
                web::scope("/users")
                    .wrap(middleware::AuthMiddleware)
                    .configure(api::users::configure),
            )
            .service(
                web::scope("/mentorship")
                    .wrap(middleware::AuthMiddleware)
                    .configure(api::mentorship::configure),
            )
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
