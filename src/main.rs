use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use parcel_soap::api;
use parcel_soap::config::Config;
use parcel_soap::error::AppError;
use parcel_soap::geo::Gazetteer;
use parcel_soap::state::AppState;
use parcel_soap::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let gazetteer = Gazetteer::load(&config.gazetteer_path);
    let store = Arc::new(MemoryStore::new());
    let shared_state = Arc::new(AppState::new(store, gazetteer, config.escape_xml_values));

    let app = api::soap::router(shared_state);

    let bind_addr = format!("{}:{}", config.bind_host, config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        escape_xml_values = config.escape_xml_values,
        "soap server started"
    );
    tracing::info!("order service: http://{bind_addr}/orderService (wsdl: ?wsdl)");
    tracing::info!("customer service: http://{bind_addr}/customerService (wsdl: ?wsdl)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
