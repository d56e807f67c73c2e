use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::infrastructure::config::{Config, StorageBackend};
use crate::infrastructure::db::DbPool;
use crate::{
    controllers::{cron::CronController, health, tts::TtsController},
    infrastructure::auth::{cron_auth_middleware, request_id_middleware},
};

/// Path the local storage backend's files are served under
pub const LOCAL_AUDIO_ROUTE: &str = "/audio";

/// Build the application router with all routes and layers
pub fn create_router(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    cron_controller: Arc<CronController>,
    tts_controller: Arc<TtsController>,
) -> Router {
    // Scheduler routes (need the cron secret)
    let cron_routes = Router::new()
        .route("/api/cron/process-audio", get(CronController::process_audio))
        .route("/api/cron/generate-content", get(CronController::generate_content))
        .route("/api/cron/maintenance", get(CronController::maintenance))
        .route(
            "/api/internal/content/regenerate",
            post(CronController::regenerate),
        )
        .with_state(cron_controller)
        .layer(middleware::from_fn_with_state(
            config.clone(),
            cron_auth_middleware,
        ));

    // TTS helper routes (public)
    let tts_routes = Router::new()
        .route("/api/tts/voices", get(TtsController::list_voices))
        .route("/api/tts/estimate", post(TtsController::estimate))
        .with_state(tts_controller);

    let router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool)
        .merge(cron_routes)
        .merge(tts_routes);

    // Local audio is served by this process; S3 objects have their own URLs
    let router = match config.storage_backend {
        StorageBackend::Local => router.nest_service(
            LOCAL_AUDIO_ROUTE,
            ServeDir::new(&config.local_storage_dir),
        ),
        StorageBackend::S3 => router,
    };

    router
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    cron_controller: Arc<CronController>,
    tts_controller: Arc<TtsController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(pool, config.clone(), cron_controller, tts_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
