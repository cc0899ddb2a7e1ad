//! HTTP entry point for the launches query API
use spacex_launches::config::AppConfig;
use spacex_launches::handlers::AppState;
use spacex_launches::repo::{self, DynamoLaunchRepository};
use spacex_launches::routes::build_router;
use spacex_launches::services::LaunchService;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    spacex_launches::init_tracing();

    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    let client = repo::connect(&config.storage).await;
    let launch_repo = DynamoLaunchRepository::new(client, config.storage.table_name.clone());
    info!(
        table = %launch_repo.table_name(),
        region = %config.storage.region,
        "DynamoDB repository ready"
    );

    let state = AppState {
        launch_service: Arc::new(LaunchService::new(Arc::new(launch_repo))),
    };

    let app = build_router(state, &config.cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("spacex_launches listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
