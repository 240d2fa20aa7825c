use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::api::users::split_list;
use crate::models::{
    CareerAdviceFilter, CareerAdviceResponse, CreateCareerAdviceRequest, CreateMentorshipRequest,
    MentorMatch, MentorshipResponse, UpdateStatusRequest,
};
use crate::services::jwt_service::Claims;
use crate::services::MentorshipService;
use crate::utils::{parse_object_id, INVALID_USER_ID};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/request", web::post().to(create_request))
        .route("/matches/{student_id}", web::get().to(find_matches))
        .route("/mine", web::get().to(my_mentorships))
        .route("/career-advice", web::post().to(create_career_advice))
        .route("/career-advice", web::get().to(get_career_advice))
        .route("/career-advice/{id}/like", web::post().to(like_career_advice))
        .route("/status/{mentorship_id}", web::put().to(update_status));
}

#[utoipa::path(
    post,
    path = "/mentorship/request",
    tag = "Mentorship",
    request_body = CreateMentorshipRequest,
    responses(
        (status = 200, description = "Pending mentorship", body = MentorshipResponse),
        (status = 400, description = "Invalid ids or an open request already exists"),
        (status = 404, description = "Student or alumni not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_request(
    service: web::Data<MentorshipService>,
    claims: web::ReqData<Claims>,
    request: web::Json<CreateMentorshipRequest>,
) -> HttpResponse {
    log::info!(
        "🤝 POST /mentorship/request - student: {}, alumni: {}",
        claims.user_id,
        request.alumni_id
    );

    match service
        .create_mentorship_request(&claims.user_id, request.into_inner())
        .await
    {
        Ok(mentorship) => HttpResponse::Ok().json(mentorship),
        Err(e) => {
            log::warn!("❌ Mentorship request failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/mentorship/matches/{student_id}",
    tag = "Mentorship",
    params(("student_id" = String, Path, description = "Student ObjectId")),
    responses((status = 200, description = "Top five candidate mentors", body = [MentorMatch])),
    security(("bearer_auth" = []))
)]
pub async fn find_matches(
    service: web::Data<MentorshipService>,
    path: web::Path<String>,
) -> HttpResponse {
    let student_id = path.into_inner();
    log::info!("🔎 GET /mentorship/matches/{}", student_id);

    match service.find_mentor_matches(&student_id).await {
        Ok(matches) => {
            log::info!("✅ {} matches for {}", matches.len(), student_id);
            HttpResponse::Ok().json(matches)
        }
        Err(e) => {
            log::warn!("❌ Matching failed for {}: {}", student_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/mentorship/mine",
    tag = "Mentorship",
    responses((status = 200, description = "Caller's mentorships, newest first", body = [MentorshipResponse])),
    security(("bearer_auth" = []))
)]
pub async fn my_mentorships(
    service: web::Data<MentorshipService>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    log::info!("📋 GET /mentorship/mine - user: {}", claims.user_id);

    match service.list_mentorships_for_user(&claims.user_id).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/mentorship/career-advice",
    tag = "Mentorship",
    request_body = CreateCareerAdviceRequest,
    responses(
        (status = 200, description = "Created post", body = CareerAdviceResponse),
        (status = 403, description = "Caller is not an alumnus")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_career_advice(
    service: web::Data<MentorshipService>,
    claims: web::ReqData<Claims>,
    request: web::Json<CreateCareerAdviceRequest>,
) -> HttpResponse {
    log::info!("📝 POST /mentorship/career-advice - alumni: {}", claims.user_id);

    match service
        .create_career_advice(&claims.user_id, request.into_inner())
        .await
    {
        Ok(advice) => HttpResponse::Ok().json(advice),
        Err(e) => {
            log::warn!("❌ Career advice creation failed: {}", e);
            e.error_response()
        }
    }
}

/// `tags` is comma separated.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CareerAdviceQuery {
    pub tags: Option<String>,
    pub alumni_id: Option<String>,
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/mentorship/career-advice",
    tag = "Mentorship",
    params(CareerAdviceQuery),
    responses(
        (status = 200, description = "Matching posts, newest first", body = [CareerAdviceResponse]),
        (status = 400, description = "Malformed alumniId")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_career_advice(
    service: web::Data<MentorshipService>,
    query: web::Query<CareerAdviceQuery>,
) -> HttpResponse {
    log::info!("📚 GET /mentorship/career-advice - {:?}", query);

    let alumni_id = match query.alumni_id.as_deref().filter(|id| !id.is_empty()) {
        Some(raw) => match parse_object_id(raw, INVALID_USER_ID) {
            Ok(id) => Some(id),
            Err(e) => return e.error_response(),
        },
        None => None,
    };
    let filter = CareerAdviceFilter {
        tags: split_list(query.tags.as_deref()),
        alumni_id,
        search: query.search.clone().filter(|s| !s.is_empty()),
    };

    match service.get_career_advice(&filter).await {
        Ok(posts) => HttpResponse::Ok().json(posts),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    post,
    path = "/mentorship/career-advice/{id}/like",
    tag = "Mentorship",
    params(("id" = String, Path, description = "Career advice ObjectId")),
    responses(
        (status = 200, description = "Post after the like", body = CareerAdviceResponse),
        (status = 404, description = "Career advice not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_career_advice(
    service: web::Data<MentorshipService>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> HttpResponse {
    let advice_id = path.into_inner();
    log::info!("👍 POST /mentorship/career-advice/{}/like - user: {}", advice_id, claims.user_id);

    match service.like_career_advice(&advice_id, &claims.user_id).await {
        Ok(advice) => HttpResponse::Ok().json(advice),
        Err(e) => {
            log::warn!("❌ Like failed on {}: {}", advice_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/mentorship/status/{mentorship_id}",
    tag = "Mentorship",
    params(("mentorship_id" = String, Path, description = "Mentorship ObjectId")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated mentorship", body = MentorshipResponse),
        (status = 400, description = "Invalid status transition"),
        (status = 403, description = "Caller is not a party to the mentorship"),
        (status = 404, description = "Mentorship not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    service: web::Data<MentorshipService>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> HttpResponse {
    let mentorship_id = path.into_inner();
    log::info!(
        "🔄 PUT /mentorship/status/{} -> {} by {}",
        mentorship_id,
        request.status,
        claims.user_id
    );

    match service
        .update_mentorship_status(&mentorship_id, request.status, &claims.user_id)
        .await
    {
        Ok(mentorship) => HttpResponse::Ok().json(mentorship),
        Err(e) => {
            log::warn!("❌ Status update failed on {}: {}", mentorship_id, e);
            e.error_response()
        }
    }
}
