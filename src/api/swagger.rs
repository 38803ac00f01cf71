use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Goal Sync Service API",
        version = "1.0.0",
        description = "User-account and profile-synchronization backend for the learning app.\n\n**Features:**\n- Email/password registration and login with JWT session tokens\n- Partial profile sync (learning goals, saved content)\n- User retrieval by email\n- Health monitoring and metrics"
    ),
    paths(
        // Auth
        crate::api::auth::authenticate,

        // Users
        crate::api::users::get_user,
        crate::api::sync::sync_profile,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::services::auth_service::AuthRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::profile_service::SyncRequest,
            crate::models::Goal,
            crate::api::health::HealthResponse,
            crate::api::health::StatusResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login. Returns the stripped user document and a 30-day JWT session token."),
        (name = "Users", description = "User document retrieval by email."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
