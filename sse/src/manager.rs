use crate::connection::SessionRegistry;
use crate::error::Error;
use crate::message::PatchElements;
use crate::session::Session;
use domain::{EntropySource, OsEntropy};
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Default time between two events on a stream.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Events buffered between a session and its response body. Kept at one so
/// that a slow client holds its session back instead of queueing events.
const SESSION_BUFFER: usize = 1;

/// Spawns stream sessions and drains them at shutdown.
///
/// Every session runs as its own task on the tracker, holding a child of the
/// manager's shutdown token. Cancelling that token closes all of them.
pub struct Manager {
    registry: Arc<SessionRegistry>,
    entropy: Arc<dyn EntropySource>,
    tick_interval: Duration,
    tracker: TaskTracker,
    shutdown: CancellationToken,
}

impl Manager {
    pub fn new(entropy: Arc<dyn EntropySource>, tick_interval: Duration) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            entropy,
            tick_interval,
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start a new session and return the receiving end of its event stream.
    ///
    /// Dropping the receiver is how the session learns that its client went
    /// away. Fails with `Draining` once [`Manager::drain`] has begun.
    pub fn open_session(&self) -> Result<mpsc::Receiver<PatchElements>, Error> {
        if self.tracker.is_closed() {
            return Err(Error::draining());
        }

        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        let session_id = self.registry.register();
        let session = Session::new(
            Arc::clone(&self.entropy),
            self.tick_interval,
            self.shutdown.child_token(),
            tx,
        );
        debug!("Opened SSE session {session_id}");

        let registry = Arc::clone(&self.registry);
        self.tracker.spawn(async move {
            let (reason, sent) = session.run().await;
            reason.log(&session_id, sent);
            if let Some(info) = registry.unregister(&session_id) {
                debug!("SSE session {session_id} was open for {:?}", info.lifetime());
            }
        });

        Ok(rx)
    }

    pub fn active_sessions(&self) -> usize {
        self.registry.len()
    }

    pub fn is_draining(&self) -> bool {
        self.tracker.is_closed()
    }

    /// Stop accepting sessions and wait up to `grace_period` for open ones to
    /// close on their own. Sessions still open after that are cancelled and
    /// awaited, and the call reports `ShutdownTimeout`.
    pub async fn drain(&self, grace_period: Duration) -> Result<(), Error> {
        self.tracker.close();
        info!(
            "Draining {} active SSE session(s), grace period {:?}",
            self.active_sessions(),
            grace_period
        );

        if tokio::time::timeout(grace_period, self.tracker.wait())
            .await
            .is_ok()
        {
            info!("All SSE sessions closed");
            return Ok(());
        }

        let outstanding = self.tracker.len();
        warn!("Grace period elapsed with {outstanding} SSE session(s) open, forcing them closed");
        self.force_close();
        self.tracker.wait().await;

        Err(Error::shutdown_timeout(outstanding))
    }

    /// Cancel every open session immediately. Idempotent.
    pub fn force_close(&self) {
        self.shutdown.cancel();
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy), DEFAULT_TICK_INTERVAL)
    }
}
