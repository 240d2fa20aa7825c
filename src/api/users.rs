use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::models::{AlumniFilter, AlumniProfile, Pagination, UserResponse};
use crate::services::jwt_service::Claims;
use crate::services::AuthService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/alumni", web::get().to(list_alumni))
        .route("/{id}", web::get().to(get_user))
        .route("/{id}/alumni", web::put().to(promote_to_alumni));
}

/// Alumni directory query string. `expertiseAreas` is comma separated.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AlumniQuery {
    pub field: Option<String>,
    pub expertise_areas: Option<String>,
    pub graduation_year: Option<i32>,
    pub skip: Option<u64>,
    pub limit: Option<i64>,
}

pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl AlumniQuery {
    fn filter(&self) -> AlumniFilter {
        AlumniFilter {
            field: self.field.clone().filter(|f| !f.is_empty()),
            expertise_areas: split_list(self.expertise_areas.as_deref()),
            graduation_year: self.graduation_year,
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip.unwrap_or(0),
            limit: self.limit.filter(|l| *l > 0),
        }
    }
}

#[utoipa::path(
    get,
    path = "/users/alumni",
    tag = "Users",
    params(AlumniQuery),
    responses((status = 200, description = "Page of alumni, newest graduates first")),
    security(("bearer_auth" = []))
)]
pub async fn list_alumni(
    auth: web::Data<AuthService>,
    query: web::Query<AlumniQuery>,
) -> HttpResponse {
    log::info!("🎓 GET /users/alumni - {:?}", query);
    let filter = query.filter();
    let page = query.pagination();

    let alumni = match auth.find_alumni(&filter, page).await {
        Ok(alumni) => alumni,
        Err(e) => return e.error_response(),
    };
    match auth.count_alumni(&filter).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({
            "data": alumni,
            "total": total,
            "skip": page.skip,
            "limit": page.limit
        })),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User without password", body = UserResponse),
        (status = 400, description = "Invalid user ID format"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(auth: web::Data<AuthService>, path: web::Path<String>) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("👤 GET /users/{}", user_id);

    match auth.find_by_id(&user_id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("❌ GET /users/{} failed: {}", user_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{id}/alumni",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = AlumniProfile,
    responses(
        (status = 200, description = "Promoted user", body = UserResponse),
        (status = 403, description = "Not yourself and no users:update permission"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn promote_to_alumni(
    auth: web::Data<AuthService>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    profile: web::Json<AlumniProfile>,
) -> HttpResponse {
    let user_id = path.into_inner();
    log::info!("🎓 PUT /users/{}/alumni - by: {}", user_id, claims.user_id);

    if claims.user_id != user_id {
        if let Err(e) = auth.require_permission(&claims.user_id, "users", "update").await {
            log::warn!("❌ Promotion of {} denied for {}: {}", user_id, claims.user_id, e);
            return e.error_response();
        }
    }

    match auth.promote_to_alumni(&user_id, profile.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::warn!("❌ Promotion of {} failed: {}", user_id, e);
            e.error_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthMiddleware;
    use crate::models::UserType;
    use crate::services::testing::Harness;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_split_list() {
        assert_eq!(split_list(Some("rust, go,,cloud ")), vec!["rust", "go", "cloud"]);
        assert!(split_list(None).is_empty());
    }

    #[actix_web::test]
    async fn test_bad_query_string_uses_error_envelope() {
        let h = Harness::new().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(h.auth.clone()))
                .app_data(web::Data::new(h.jwt.clone()))
                .app_data(crate::api::query_config())
                .service(web::scope("/users").wrap(AuthMiddleware).configure(configure)),
        )
        .await;
        let sam = h.insert_user("Sam", UserType::Student, Some(&h.user_role)).await;
        let bearer = format!("Bearer {}", h.token_for(&sam));

        for uri in ["/users/alumni?graduationYear=abc", "/users/alumni?skip=-1"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(("Authorization", bearer.clone()))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let body: serde_json::Value = test::read_body_json(res).await;
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().unwrap().contains("Query deserialize error"));
        }
    }

    #[actix_web::test]
    async fn test_alumni_directory_and_promotion() {
        let h = Harness::new().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(h.auth.clone()))
                .app_data(web::Data::new(h.jwt.clone()))
                .service(web::scope("/users").wrap(AuthMiddleware).configure(configure)),
        )
        .await;

        h.insert_alumnus("Ada", 2020, &["rust"]).await;
        h.insert_alumnus("Grace", 2018, &["cobol"]).await;
        let sam = h.insert_user("Sam", UserType::Student, Some(&h.user_role)).await;
        let eve = h.insert_user("Eve", UserType::Student, Some(&h.user_role)).await;
        let bearer = format!("Bearer {}", h.token_for(&sam));

        let req = test::TestRequest::get()
            .uri("/users/alumni?graduationYear=2020")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let page: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page["total"], 1);
        assert_eq!(page["data"][0]["name"], "Ada");

        let profile = serde_json::json!({ "graduationYear": 2022, "field": "Physics" });

        // Promoting someone else needs users:update.
        let req = test::TestRequest::put()
            .uri(&format!("/users/{}/alumni", eve.id_hex()))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(&profile)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&format!("/users/{}/alumni", sam.id_hex()))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(&profile)
            .to_request();
        let promoted: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(promoted["userType"], "alumni");

        let req = test::TestRequest::get()
            .uri("/users/not-an-id")
            .insert_header(("Authorization", bearer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
