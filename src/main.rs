use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicepaper_backend::controllers::ArticleController;
use voicepaper_backend::domain::article::ArticleService;
use voicepaper_backend::infrastructure::config::{Config, LogFormat};
use voicepaper_backend::infrastructure::db::{check_connection, create_pool, migrate};
use voicepaper_backend::infrastructure::http::start_http_server;
use voicepaper_backend::infrastructure::repositories::ArticleRepository;
use voicepaper_backend::infrastructure::seed::seed_from_manifest;
use voicepaper_backend::infrastructure::synthesis::MiniMaxClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting VoicePaper Backend on {}:{}",
        config.host,
        config.port
    );

    // Managed storage must exist before the SQLite file can be created in it
    tokio::fs::create_dir_all(config.audio_dir()).await?;
    tracing::info!(audio_dir = %config.audio_dir().display(), "Audio storage ready");

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection and bring the schema up to date
    check_connection(&pool).await?;
    migrate(&pool).await?;
    tracing::info!("Database connected and migrated");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool)
    let article_repo = Arc::new(ArticleRepository::new(pool.clone()));

    // 2. Instantiate the speech provider client
    let synthesis_client = Arc::new(MiniMaxClient::new(
        config.minimax_base_url.clone(),
        config.minimax_api_key.clone(),
        Duration::from_millis(config.tts_poll_interval_ms),
        config.tts_poll_max_attempts,
    ));

    // 3. Instantiate services (inject repositories and clients)
    let article_service = Arc::new(ArticleService::new(
        article_repo.clone(),
        synthesis_client,
        config.audio_dir(),
    ));

    // 4. Instantiate controllers (inject services)
    let article_controller = Arc::new(ArticleController::new(
        article_service.clone(),
        article_repo.clone(),
    ));

    // Import any legacy article library before accepting traffic
    seed_from_manifest(&article_service, &article_repo, &config.data_dir).await;

    // Start HTTP server with all routes
    start_http_server(pool, config, article_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voicepaper_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voicepaper_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
