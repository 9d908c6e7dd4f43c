use std::sync::Arc;

use itinera_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    itinera_observability::init();

    let config = AppConfig::from_env()?;
    let services = Arc::new(itinera_api::app::services::build_services(&config).await?);
    let app = itinera_api::app::build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Accepted jobs must still reach a terminal state.
    tracing::info!(in_flight = services.tasks.in_flight(), "draining background jobs");
    services.tasks.drain().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
