mod api;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn allowed_origins() -> Vec<String> {
    env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let mongodb_uri = env::var("MONGODB_URI").expect("MONGODB_URI must be set");

    log::info!("🚀 Starting Goal Sync Service...");
    log::info!("📊 Database: {}", mongodb_uri);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    let origins = allowed_origins();
    log::info!("🌍 Allowed origins: {:?}", origins);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Status & health
            .route("/", web::get().to(api::health::root_status))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            .route("/api/health", web::get().to(api::health::health_check))
            // Auth: register or login in one endpoint
            .route("/api/auth", web::post().to(api::auth::authenticate))
            .route("/api/auth/verify", web::get().to(api::auth::verify_token))
            // Profile sync (partial update, shallow replace per field)
            .route("/api/sync", web::post().to(api::sync::sync_profile))
            // User retrieval + goal-data diagnostics
            .route("/api/user/{email}", web::get().to(api::users::get_user))
            .route("/api/debug/{email}", web::get().to(api::users::debug_user))
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
