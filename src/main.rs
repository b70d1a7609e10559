use domain::OsEntropy;
use log::*;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
        std::process::exit(1);
    }

    info!(
        "Starting server on {} (tick interval {:?}, shutdown grace period {:?})",
        config.server_address(),
        config.tick_interval(),
        config.shutdown_grace_period()
    );

    let sse_manager = Arc::new(sse::Manager::new(
        Arc::new(OsEntropy),
        config.tick_interval(),
    ));
    let landing_page = web::page::render(&config);
    let app_state = AppState::new(config, &sse_manager, landing_page);

    if let Err(e) = web::init_server(app_state).await {
        error!("Error running server: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}
