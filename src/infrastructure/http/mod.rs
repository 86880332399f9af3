use axum::{middleware, routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, ArticleController};
use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::middleware::request_id_middleware;

/// Assemble the application router.
///
/// `/audio` serves the managed artifact directory; `ServeDir` answers Range
/// requests, which audio players need for seeking.
pub fn build_router(
    pool: Arc<DbPool>,
    audio_dir: PathBuf,
    article_controller: Arc<ArticleController>,
) -> Router {
    let article_routes = Router::new()
        .route(
            "/api/v1/articles",
            get(ArticleController::list_articles).post(ArticleController::create_article),
        )
        .route("/api/v1/articles/:id", get(ArticleController::get_article))
        .with_state(article_controller);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool.clone())
        .merge(article_routes)
        .nest_service("/audio", ServeDir::new(audio_dir))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    article_controller: Arc<ArticleController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(pool, config.audio_dir(), article_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
