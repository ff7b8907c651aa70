use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use studydesk_server::api::{AppState, build_router};
use studydesk_server::config::ServerConfig;
use studydesk_server::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting studydesk server");
    let config = ServerConfig::from_env();

    let database = db::init_pool_and_migrate(&config.database_url)
        .await
        .context("failed to initialize database")?;
    db::seed(&database).await.context("failed to seed database")?;

    let state = Arc::new(AppState::new(database, &config).context("failed to build app state")?);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
