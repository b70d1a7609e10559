//! HTTP surface: the landing page, the event stream endpoint and the
//! server lifecycle around them.

use crate::error::{Error, Result};
use crate::shutdown::{termination_signals, ShutdownCoordinator};
use futures::Stream;
use log::*;
use service::AppState;
use std::time::Duration;
use tokio::net::TcpListener;

mod controller;
pub mod error;
pub mod page;
pub mod router;
pub mod shutdown;
mod sse;

/// How long the HTTP server gets to close its connections once every session
/// has ended, before it is aborted.
const CONNECTION_CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Bind the configured address and serve until a termination signal has been
/// handled. Bind and signal setup failures are returned before any connection
/// is accepted.
pub async fn init_server(app_state: AppState) -> Result<()> {
    let server_address = app_state.config.server_address();

    let signals = Box::pin(termination_signals().map_err(Error::signal_setup)?);

    let listener = TcpListener::bind(&server_address)
        .await
        .map_err(|e| Error::listen_bind(&server_address, e))?;
    info!("Server started, listening on {server_address}");

    let coordinator = ShutdownCoordinator::new(app_state.config.shutdown_grace_period());
    serve(listener, app_state, coordinator, signals).await
}

/// Serve `listener` until the first item arrives on `signals`, then stop
/// accepting connections and drain open sessions within the coordinator's
/// grace period. Drain timeouts are logged and do not make this fail.
pub async fn serve<S>(
    listener: TcpListener,
    app_state: AppState,
    coordinator: ShutdownCoordinator,
    mut signals: S,
) -> Result<()>
where
    S: Stream<Item = &'static str> + Unpin,
{
    let router = router::define_routes(app_state.clone());
    let stop_accepting = coordinator.token();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { stop_accepting.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // The server only stops on its own when something went wrong.
            return match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(Error::serve(e)),
                Err(e) => Err(Error::serve(e)),
            };
        }
        signal = coordinator.await_signal(&mut signals) => {
            info!(
                "Received {}, no longer accepting connections",
                signal.unwrap_or("end of signal stream")
            );
        }
    }

    if let Err(e) = coordinator
        .drain(&app_state.sse_manager, &mut signals)
        .await
    {
        warn!("Error encountered during server shutdown: {e}");
    }

    match tokio::time::timeout(CONNECTION_CLOSE_TIMEOUT, &mut server).await {
        Ok(Ok(Err(e))) => warn!("Server stopped with an error during shutdown: {e}"),
        Ok(_) => {}
        Err(_) => {
            warn!("Connections still open after {CONNECTION_CLOSE_TIMEOUT:?}, closing them");
            server.abort();
        }
    }

    Ok(())
}
