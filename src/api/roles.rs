use actix_web::{web, HttpResponse, ResponseError};

use crate::models::{CreateRoleRequest, RoleResponse};
use crate::services::jwt_service::Claims;
use crate::services::{AuthService, RolesService};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_role))
        .route("", web::get().to(list_roles))
        .route("/{id}", web::get().to(get_role));
}

#[utoipa::path(
    post,
    path = "/roles",
    tag = "Roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 200, description = "Role created", body = RoleResponse),
        (status = 403, description = "Missing permission roles:create")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    auth: web::Data<AuthService>,
    roles: web::Data<RolesService>,
    claims: web::ReqData<Claims>,
    request: web::Json<CreateRoleRequest>,
) -> HttpResponse {
    log::info!("🛡️ POST /roles - name: {}, by: {}", request.name, claims.user_id);

    if let Err(e) = auth.require_permission(&claims.user_id, "roles", "create").await {
        log::warn!("❌ Role creation denied for {}: {}", claims.user_id, e);
        return e.error_response();
    }

    match roles.create_role(request.into_inner()).await {
        Ok(role) => HttpResponse::Ok().json(role),
        Err(e) => {
            log::warn!("❌ Role creation failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/roles",
    tag = "Roles",
    responses((status = 200, description = "All roles", body = [RoleResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_roles(roles: web::Data<RolesService>) -> HttpResponse {
    log::info!("📋 GET /roles");

    match roles.list_roles().await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ObjectId")),
    responses(
        (status = 200, description = "Role", body = RoleResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Role not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_role(roles: web::Data<RolesService>, path: web::Path<String>) -> HttpResponse {
    let role_id = path.into_inner();
    log::info!("🔍 GET /roles/{}", role_id);

    match roles.get_role_by_id(&role_id).await {
        Ok(role) => HttpResponse::Ok().json(role),
        Err(e) => {
            log::warn!("❌ GET /roles/{} failed: {}", role_id, e);
            e.error_response()
        }
    }
}
