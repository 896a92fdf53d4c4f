mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::{Compress, Logger}, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{session_service, MemoryUserStore, UserStore};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Mentorix accounts service...");

    let store: Arc<dyn UserStore> = if config.uses_memory_store() {
        log::warn!("⚠️  Using in-memory user store, accounts are lost on restart");
        Arc::new(MemoryUserStore::new())
    } else {
        let db = database::MongoDB::new(&config.database_url).await.map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
        log::info!("✅ MongoDB connected successfully");
        Arc::new(db)
    };

    let cookie_key = config.cookie_key().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let bind_address = config.bind_address();
    let store_data: web::Data<dyn UserStore> = web::Data::from(store);
    let config_data = web::Data::new(config);

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in &config_data.allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(config_data.clone())
            .wrap(session_service::middleware(
                cookie_key.clone(),
                config_data.session_cookie_secure,
            ))
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Login, logout, signup
            .configure(api::accounts::configure)
    })
    .bind(bind_address.as_str())?
    .run()
    .await
}
