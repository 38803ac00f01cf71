use crate::api::metrics;
use crate::database::MongoDB;
use crate::services::auth_service;
use crate::services::auth_service::{AuthRequest, AuthResponse};
use crate::utils::AppError;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

#[utoipa::path(
    post,
    path = "/api/auth",
    tag = "Auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Authentication successful", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "Unknown email on login"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn authenticate(
    db: web::Data<MongoDB>,
    request: web::Json<AuthRequest>,
) -> HttpResponse {
    metrics::increment_auth_requests();
    let email = request.email.as_deref().unwrap_or("N/A");
    let mode = if request.is_register { "register" } else { "login" };
    log::info!("🔐 POST /api/auth - email: {}, mode: {}", email, mode);

    match auth_service::authenticate(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Auth successful: {}", email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Auth failed: {} - {}", email, e);
            metrics::increment_error_count();
            e.error_response()
        }
    }
}

// Token introspection: echoes the claims of a still-valid session token
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    metrics::increment_auth_requests();
    log::info!("✓ GET /api/auth/verify");

    if let Some(auth_value) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_value.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return match auth_service::verify_token(token) {
                    Ok(claims) => {
                        log::info!("✅ Token valid for: {}", claims.sub);
                        HttpResponse::Ok().json(serde_json::json!({
                            "valid": true,
                            "email": claims.sub,
                            "exp": claims.exp
                        }))
                    }
                    Err(e) => {
                        log::warn!("❌ Invalid token: {}", e);
                        metrics::increment_error_count();
                        e.error_response()
                    }
                };
            }
        }
    }

    metrics::increment_error_count();
    AppError::BadRequest("No valid Authorization header".to_string()).error_response()
}
