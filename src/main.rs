use leadbox::config::Config;
use leadbox::db::SqliteStorage;
use leadbox::service::MemorySessionStore;
use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        db_path = %cfg.db_path().display(),
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel(),
        debug = cfg.debug
    );
    if cfg.uses_default_secret() {
        warn!("SECRET_KEY not set; using the built-in default, do not run like this in production");
    }

    let storage = SqliteStorage::open(cfg.db_path(), cfg.lock_timeout()).await?;
    storage.init_schema().await?;
    info!("Database initialized");

    let state = leadbox::LeadboxState::new(
        Arc::new(storage.clone()),
        Arc::new(MemorySessionStore::with_ttl(cfg.session_ttl())),
        &cfg,
    );
    if state
        .gate
        .ensure_default_admin(&cfg.admin_username, &cfg.admin_password)
        .await?
    {
        warn!(
            username = %cfg.admin_username,
            "default admin account created; change its password"
        );
    }

    let app = leadbox::leadbox_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
