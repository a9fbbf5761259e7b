use std::net::SocketAddr;
use std::sync::Arc;

use studio_core::asset::AssetStore;
use studio_core::copy::{CopyGenerator, DisabledCopyGenerator};
use studio_core::store::{MemoryPageStore, PageStore};
use studio_events::EventBus;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_api::background::session_sweep;
use studio_api::config::ServerConfig;
use studio_api::copywriter::HttpCopyGenerator;
use studio_api::router::build_app_router;
use studio_api::save::close_all_sessions;
use studio_api::sessions::SessionRegistry;
use studio_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_api=debug,studio_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (store, assets, pool) = match &config.database_url {
        Some(url) => {
            let pool = studio_db::create_pool(url).await?;
            tracing::info!("Database connection pool created");

            studio_db::health_check(&pool).await?;
            studio_db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            let store = Arc::new(studio_db::PgPageStore::new(pool.clone()));
            (
                Arc::clone(&store) as Arc<dyn PageStore>,
                store as Arc<dyn AssetStore>,
                Some(pool),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store");
            let store = Arc::new(MemoryPageStore::new());
            (
                Arc::clone(&store) as Arc<dyn PageStore>,
                store as Arc<dyn AssetStore>,
                None,
            )
        }
    };

    // --- Copy generation ---
    let copy_generator: Arc<dyn CopyGenerator> = match &config.copy_endpoint {
        Some(endpoint) => {
            tracing::info!(endpoint = %endpoint, "Copy generation enabled");
            Arc::new(HttpCopyGenerator::new(endpoint, config.copy_api_key.clone())?)
        }
        None => Arc::new(DisabledCopyGenerator),
    };

    // --- App state ---
    let state = AppState {
        store,
        assets,
        pool,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
        event_bus: Arc::new(EventBus::default()),
        copy_generator,
        shutdown: CancellationToken::new(),
    };

    // --- Background tasks ---
    tokio::spawn(session_sweep::run(
        state.clone(),
        config.session_idle_timeout(),
        config.session_sweep_interval(),
    ));

    let app = build_app_router(state.clone(), &config);

    // --- Start server ---
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, saving open sessions");

    match tokio::time::timeout(config.shutdown_timeout(), close_all_sessions(&state)).await {
        Ok(saved) => tracing::info!(saved, "Open sessions closed"),
        Err(_) => tracing::warn!("Timed out saving open sessions"),
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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
