use crate::database::MongoDB;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    pub timestamp: i64,
    pub database: String,
}

fn database_status(connected: bool) -> String {
    if connected { "connected" } else { "disconnected" }.to_string()
}

// Root status page
pub async fn root_status(db: web::Data<MongoDB>) -> impl Responder {
    let connected = db.ping().await;
    HttpResponse::Ok().json(StatusResponse {
        message: "Goal Sync Service is running".to_string(),
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        database: database_status(connected),
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service liveness and store connectivity", body = HealthResponse)
    )
)]
pub async fn health_check(db: web::Data<MongoDB>) -> impl Responder {
    let connected = db.ping().await;
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        database: database_status(connected),
    })
}
