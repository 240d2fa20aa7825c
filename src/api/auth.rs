use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::AuthMiddleware;
use crate::services::auth_service::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RefreshTokenRequest, ResetPasswordRequest, SignupRequest, TokenPair,
};
use crate::services::jwt_service::Claims;
use crate::services::AuthService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .route("/refresh", web::post().to(refresh_tokens))
        .route("/forgot-password", web::post().to(forgot_password))
        .route("/reset-password", web::put().to(reset_password))
        .service(
            web::resource("/change-password")
                .wrap(AuthMiddleware)
                .route(web::put().to(change_password)),
        )
        .service(web::resource("/me").wrap(AuthMiddleware).route(web::get().to(get_me)))
        .service(
            web::resource("/permissions")
                .wrap(AuthMiddleware)
                .route(web::get().to(get_permissions)),
        );
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = crate::models::UserResponse),
        (status = 400, description = "Email already in use, invalid role or invalid input")
    )
)]
pub async fn signup(
    auth: web::Data<AuthService>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/signup - email: {}", request.email);

    match auth.signup(request.into_inner()).await {
        Ok(user) => {
            log::info!("✅ Signup successful: {}", user.email);
            HttpResponse::Ok().json(serde_json::json!({
                "statusCode": 200,
                "data": user
            }))
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Wrong credentials")
    )
)]
pub async fn login(auth: web::Data<AuthService>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);
    let email = request.email.clone();

    match auth.login(request.into_inner()).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            HttpResponse::Ok().json(serde_json::json!({
                "statusCode": 200,
                "userId": response.user_id,
                "accessToken": response.tokens.access_token,
                "refreshToken": response.tokens.refresh_token
            }))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 401, description = "Refresh Token is invalid")
    )
)]
pub async fn refresh_tokens(
    auth: web::Data<AuthService>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    log::info!("🔄 POST /auth/refresh");

    match auth.refresh_tokens(&request.refresh_token).await {
        Ok(tokens) => {
            log::info!("✅ Token refreshed");
            HttpResponse::Ok().json(tokens)
        }
        Err(e) => {
            log::warn!("❌ Token refresh failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Same message whether or not the account exists")
    )
)]
pub async fn forgot_password(
    auth: web::Data<AuthService>,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    log::info!("📧 POST /auth/forgot-password");

    match auth.forgot_password(&request.email).await {
        Ok(message) => HttpResponse::Ok().json(serde_json::json!({ "message": message })),
        Err(e) => {
            log::warn!("❌ Forgot password failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 401, description = "Invalid link")
    )
)]
pub async fn reset_password(
    auth: web::Data<AuthService>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    log::info!("🔑 PUT /auth/reset-password");

    match auth.reset_password(request.into_inner()).await {
        Ok(()) => {
            log::info!("✅ Password reset");
            HttpResponse::Ok().json(serde_json::json!({ "message": "Password reset successfully" }))
        }
        Err(e) => {
            log::warn!("❌ Password reset failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Wrong credentials or missing token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    auth: web::Data<AuthService>,
    claims: web::ReqData<Claims>,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse {
    log::info!("🔑 PUT /auth/change-password - user: {}", claims.user_id);

    match auth.change_password(&claims.user_id, request.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Password changed successfully" })),
        Err(e) => {
            log::warn!("❌ Change password failed for {}: {}", claims.user_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = crate::models::UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(auth: web::Data<AuthService>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("👤 GET /auth/me - user: {}", claims.user_id);

    match auth.find_by_id(&claims.user_id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("❌ GET /auth/me failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/permissions",
    tag = "Auth",
    responses(
        (status = 200, description = "Permissions granted by the user's role", body = [crate::models::Permission]),
        (status = 403, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_permissions(
    auth: web::Data<AuthService>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    log::info!("🛡️ GET /auth/permissions - user: {}", claims.user_id);

    match auth.get_user_permissions(&claims.user_id).await {
        Ok(permissions) => HttpResponse::Ok().json(permissions),
        Err(e) => {
            log::warn!("❌ Permission lookup failed for {}: {}", claims.user_id, e);
            e.error_response()
        }
    }
}
