//! One client's event stream, from connection open to close.
//!
//! A session ticks on a fixed interval. Each tick draws one `StreamEvent`,
//! renders it as a `Fragment` and writes it to the client as a single
//! patch-elements message. The session owns its cancellation token and
//! observes it at every suspension point, so it never outlives the shutdown
//! that cancels it.

use crate::connection::SessionId;
use crate::error::{Error, ErrorKind};
use crate::message::PatchElements;
use domain::{EntropySource, Fragment, StreamEvent};
use log::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Why a session stopped.
#[derive(Debug)]
pub enum CloseReason {
    /// The client's side of the stream went away.
    ClientDisconnected,
    /// The session's cancellation token fired.
    Cancelled,
    /// Generating, encoding or writing an event failed.
    Failed(Error),
}

impl CloseReason {
    pub fn log(&self, session_id: &SessionId, events_sent: u64) {
        match self {
            CloseReason::ClientDisconnected => {
                debug!("SSE client for session {session_id} disconnected after {events_sent} event(s)")
            }
            CloseReason::Cancelled => {
                debug!("SSE session {session_id} cancelled after {events_sent} event(s)")
            }
            CloseReason::Failed(e) if e.error_kind == ErrorKind::TransportWrite => {
                debug!("SSE session {session_id} stopped, client stream closed during write: {e}")
            }
            CloseReason::Failed(e) => {
                error!("SSE session {session_id} failed after {events_sent} event(s): {e}")
            }
        }
    }
}

pub struct Session {
    entropy: Arc<dyn EntropySource>,
    interval: Duration,
    cancel: CancellationToken,
    sender: Sender<PatchElements>,
}

impl Session {
    pub fn new(
        entropy: Arc<dyn EntropySource>,
        interval: Duration,
        cancel: CancellationToken,
        sender: Sender<PatchElements>,
    ) -> Self {
        Self {
            entropy,
            interval,
            cancel,
            sender,
        }
    }

    /// Drives the session until it closes. Returns why it closed together
    /// with the number of events written.
    ///
    /// The first tick fires one interval after start. Ticks missed under load
    /// are skipped rather than burst.
    pub async fn run(self) -> (CloseReason, u64) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sent = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return (CloseReason::Cancelled, sent),
                _ = self.sender.closed() => return (CloseReason::ClientDisconnected, sent),
                _ = ticker.tick() => {}
            }

            let patch = match self.next_patch() {
                Ok(patch) => patch,
                Err(e) => return (CloseReason::Failed(e), sent),
            };

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return (CloseReason::Cancelled, sent),
                result = self.sender.send(patch) => {
                    if result.is_err() {
                        let e = Error::transport_write("client stream is closed");
                        return (CloseReason::Failed(e), sent);
                    }
                    sent += 1;
                }
            }
        }
    }

    fn next_patch(&self) -> Result<PatchElements, Error> {
        let event = StreamEvent::generate(self.entropy.as_ref())?;
        let fragment = Fragment::encode(&event);
        Ok(PatchElements::try_from(&fragment)?)
    }
}
