use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

// Per-endpoint counters, incremented by the API handlers
static AUTH_REQUESTS: AtomicU64 = AtomicU64::new(0);
static SYNC_REQUESTS: AtomicU64 = AtomicU64::new(0);
static USER_LOOKUPS: AtomicU64 = AtomicU64::new(0);
static REQUEST_ERRORS: AtomicU64 = AtomicU64::new(0);

pub fn increment_auth_requests() {
    AUTH_REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_sync_requests() {
    SYNC_REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_user_lookups() {
    USER_LOOKUPS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    REQUEST_ERRORS.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub auth_requests_total: u64,
    pub sync_requests_total: u64,
    pub user_lookups_total: u64,
    pub request_errors_total: u64,
}

fn render_prometheus(auth: u64, sync: u64, lookups: u64, errors: u64) -> String {
    format!(
        "# HELP auth_requests_total Total register/login requests\n\
         # TYPE auth_requests_total counter\n\
         auth_requests_total {}\n\
         # HELP sync_requests_total Total profile sync requests\n\
         # TYPE sync_requests_total counter\n\
         sync_requests_total {}\n\
         # HELP user_lookups_total Total user retrieval and debug lookups\n\
         # TYPE user_lookups_total counter\n\
         user_lookups_total {}\n\
         # HELP request_errors_total Total requests answered with an error status\n\
         # TYPE request_errors_total counter\n\
         request_errors_total {}\n",
        auth, sync, lookups, errors
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Per-endpoint request counters", body = MetricsResponse)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let body = render_prometheus(
        AUTH_REQUESTS.load(Ordering::Relaxed),
        SYNC_REQUESTS.load(Ordering::Relaxed),
        USER_LOOKUPS.load(Ordering::Relaxed),
        REQUEST_ERRORS.load(Ordering::Relaxed),
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}
