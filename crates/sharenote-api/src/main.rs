//! sharenote-api - HTTP API server for sharenote

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharenote_api::{build_rate_limiter, create_router, AppState, ServerConfig, StoreBackend};
use sharenote_core::{NoteRepository, UserRepository};
use sharenote_crypto::KdfParams;
use sharenote_db::{
    log_pool_metrics, Database, MemoryNoteRepository, MemoryUserRepository, PgNoteRepository,
    PgUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "sharenote_api=debug,sharenote_db=info,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sharenote_api=debug,sharenote_db=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optional file output with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("sharenote-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false)); // no ANSI in files
            registry.with(layer).init();
        }
        Some(guard)
    } else if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
        None
    } else {
        let mut layer = tracing_subscriber::fmt::layer();
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServerConfig::from_env()?;

    let users: Arc<dyn UserRepository>;
    let notes: Arc<dyn NoteRepository>;
    match config.store_backend {
        StoreBackend::Postgres => {
            let db =
                Database::connect_with_config(&config.database_url, config.pool_config()).await?;
            db.migrate().await?;
            info!(subsystem = "db", "Migrations applied");
            log_pool_metrics(db.pool());
            users = Arc::new(PgUserRepository::new(db.pool.clone()));
            notes = Arc::new(PgNoteRepository::new(db.pool.clone()));
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            users = Arc::new(MemoryUserRepository::new());
            notes = Arc::new(MemoryNoteRepository::new());
        }
    }

    let rate_limiter = build_rate_limiter(&config)?;
    info!(
        enabled = config.rate_limit_enabled,
        requests = config.rate_limit_requests,
        period_secs = config.rate_limit_period_secs,
        "Rate limiting configured"
    );

    let state = AppState::new(users, notes, KdfParams::default()).with_rate_limiter(rate_limiter);
    let app = create_router(state, &config);

    // Start server
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
