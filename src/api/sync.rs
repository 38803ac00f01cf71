use crate::api::metrics;
use crate::database::MongoDB;
use crate::services::profile_service;
use crate::services::profile_service::SyncRequest;
use actix_web::{web, HttpResponse, ResponseError};

#[utoipa::path(
    post,
    path = "/api/sync",
    tag = "Users",
    request_body = SyncRequest,
    responses(
        (status = 200, description = "Patch applied; fields absent from the body are left untouched"),
        (status = 400, description = "Missing email"),
        (status = 404, description = "Unknown email, nothing written")
    )
)]
pub async fn sync_profile(
    db: web::Data<MongoDB>,
    request: web::Json<SyncRequest>,
) -> HttpResponse {
    metrics::increment_sync_requests();
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔄 POST /api/sync - email: {}", email);

    match profile_service::sync_profile(&db, &request).await {
        Ok(()) => {
            log::info!("✅ Profile synced: {}", email);
            HttpResponse::Ok().json(serde_json::json!({ "success": true }))
        }
        Err(e) => {
            log::warn!("❌ Sync failed: {} - {}", email, e);
            metrics::increment_error_count();
            e.error_response()
        }
    }
}
