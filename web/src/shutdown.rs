//! Graceful shutdown coordination via `CancellationToken`.
//!
//! The first termination signal cancels the coordinator's token, which stops
//! the listener from accepting connections, and starts a bounded drain of
//! the open stream sessions. A second signal during the drain force-closes
//! whatever is still open. Later signals are ignored.

use async_stream::stream;
use futures::{Stream, StreamExt};
use log::*;
use sse::Manager;
use std::io;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default time sessions get to close on their own once shutdown begins.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Coordinates graceful shutdown of the listener and all stream sessions.
pub struct ShutdownCoordinator {
    token: CancellationToken,
    grace_period: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            grace_period,
        }
    }

    /// Get a clone of the cancellation token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Initiate shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Whether a shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the first termination signal, then initiate shutdown.
    ///
    /// Returns the signal's name, or `None` if the signal stream ended without
    /// delivering one (shutdown is initiated either way).
    pub async fn await_signal<S>(&self, signals: &mut S) -> Option<&'static str>
    where
        S: Stream<Item = &'static str> + Unpin,
    {
        let signal = signals.next().await;
        self.shutdown();
        signal
    }

    /// Drain `manager`'s sessions within the grace period.
    ///
    /// Any signal arriving on `signals` meanwhile force-closes the remaining
    /// sessions without waiting out the grace period.
    pub async fn drain<S>(&self, manager: &Manager, signals: &mut S) -> Result<(), sse::error::Error>
    where
        S: Stream<Item = &'static str> + Unpin,
    {
        let drain = manager.drain(self.grace_period);
        tokio::pin!(drain);

        loop {
            tokio::select! {
                result = &mut drain => return result,
                Some(signal) = signals.next() => {
                    warn!("Received {signal} while draining, forcing remaining sessions closed");
                    manager.force_close();
                }
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

/// Stream of process termination signals (SIGINT and SIGTERM on Unix,
/// ctrl-c elsewhere). Handlers are installed before this returns, so a
/// signal arriving at any later point is delivered on the stream.
#[cfg(unix)]
pub fn termination_signals() -> io::Result<impl Stream<Item = &'static str> + Send> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(stream! {
        loop {
            let name = tokio::select! {
                Some(()) = interrupt.recv() => "SIGINT",
                Some(()) = terminate.recv() => "SIGTERM",
                else => break,
            };
            yield name;
        }
    })
}

#[cfg(not(unix))]
pub fn termination_signals() -> io::Result<impl Stream<Item = &'static str> + Send> {
    Ok(stream! {
        while tokio::signal::ctrl_c().await.is_ok() {
            yield "ctrl-c";
        }
    })
}
