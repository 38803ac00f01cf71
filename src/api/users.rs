use crate::api::metrics;
use crate::database::MongoDB;
use crate::services::profile_service;
use actix_web::{web, HttpResponse, ResponseError};

#[utoipa::path(
    get,
    path = "/api/user/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "Email identifying the user")
    ),
    responses(
        (status = 200, description = "User document, password stripped"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn get_user(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    metrics::increment_user_lookups();
    let email = path.into_inner();
    log::info!("👤 GET /api/user/{}", email);

    match profile_service::get_user(&db, &email).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({ "user": user })),
        Err(e) => {
            log::warn!("❌ User lookup failed: {} - {}", email, e);
            metrics::increment_error_count();
            e.error_response()
        }
    }
}

// Troubleshooting endpoint, not part of the stable contract
pub async fn debug_user(db: web::Data<MongoDB>, path: web::Path<String>) -> HttpResponse {
    metrics::increment_user_lookups();
    let email = path.into_inner();
    log::info!("🔍 GET /api/debug/{}", email);

    match profile_service::debug_user(&db, &email).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            log::warn!("❌ Debug lookup failed: {} - {}", email, e);
            metrics::increment_error_count();
            e.error_response()
        }
    }
}
