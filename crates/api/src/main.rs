use std::net::SocketAddr;
use std::sync::Arc;

use reel_db::store::{MemoryMovieStore, MovieStore, PgMovieStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_api::config::{LogFormat, ServerConfig, StoreBackend};
use reel_api::media::MediaStorage;
use reel_api::router::build_app_router;
use reel_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "reel_api=debug,reel_db=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Movie store ---
    let store: Arc<dyn MovieStore> = match &config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = reel_db::create_pool(database_url, *max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            reel_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            reel_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgMovieStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory movie store; data is lost on restart");
            Arc::new(MemoryMovieStore::new())
        }
    };

    // --- Media ---
    let media = MediaStorage::new(config.media_root.clone(), config.media_url.clone());
    tokio::fs::create_dir_all(media.root())
        .await
        .expect("Failed to create media root");
    tracing::info!(root = %media.root().display(), url = %config.media_url, "Media storage ready");

    // --- App state ---
    let state = AppState {
        store,
        media: Arc::new(media),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
