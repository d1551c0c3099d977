use axum::{http::StatusCode, middleware as axum_middleware, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use course_api::database::manager::DatabaseManager;
use course_api::database::schema;
use course_api::{config, handlers, logging, middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    // Guards keep the rotating file sinks alive for the process lifetime
    let _log_guards = logging::init();
    info!("Starting course API in {:?} mode", config.environment);

    // Bring the schema up before serving. If the database is unreachable the
    // server still starts; the pool is retried lazily on the first request.
    match DatabaseManager::pool().await {
        Ok(pool) => {
            if let Err(e) = schema::ensure_schema(&pool).await {
                warn!("Failed to ensure database schema: {}", e);
            }
        }
        Err(e) => warn!("Database unavailable at startup: {}", e),
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    info!("Course API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    // Every resource route sits behind the bearer-token gate; only the
    // liveness probe is public.
    let protected = Router::new()
        .merge(handlers::courses::routes())
        .merge(handlers::lessons::routes())
        .layer(axum_middleware::from_fn(
            middleware::auth::jwt_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::request_log::log_requests,
        ))
}

async fn health() -> impl IntoResponse {
    match DatabaseManager::health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded" })),
            )
        }
    }
}
