use bookscraper::{
    AppState, app,
    config::Config,
    db::create_pool,
    error::{AppError, AppResult},
    init_tracing,
    metrics::install_recorder,
    middleware::logger::{AccessLogTarget, build_access_logger},
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = Config::from_env()?;
    init_tracing(&config);

    let db = create_pool(&config.database_url, config.database_max_connections)?;
    let metrics = install_recorder()?;
    let target = AccessLogTarget::parse(&config.access_log_target)?;
    let access_log = build_access_logger(&target)?;

    let addr: SocketAddr = config
        .server_address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;

    let state = Arc::new(AppState::new(db, config, access_log, metrics));
    let app = app(state);

    tracing::info!(%addr, "Server running");
    tracing::info!(%addr, "Metrics available at /metrics");

    axum::Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server failed: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
