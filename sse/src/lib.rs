//! Server-Sent Events (SSE) streaming sessions.
//!
//! This crate owns everything that happens between a client opening the
//! event stream and that stream closing.
//!
//! # Architecture
//!
//! - **One task per stream**: each `GET /stream` gets its own `Session`
//!   running on the `Manager`'s task tracker. Sessions share no mutable
//!   state; each draws its own bytes from the entropy source.
//! - **Fixed cadence**: a session writes exactly one patch-elements message
//!   per tick, in generation order. A write that cannot complete ends the
//!   session; nothing is retried.
//! - **Explicit cancellation**: every session holds a child of the manager's
//!   shutdown token and checks it at each suspension point (waiting for the
//!   next tick, waiting to write). Client disconnects are observed through
//!   the session's channel closing when the response body is dropped.
//! - **Bounded drain**: `Manager::drain` refuses new sessions, waits for open
//!   ones up to a grace period, then force-closes the rest.
//!
//! # Message Flow
//!
//! 1. The web layer calls `Manager::open_session()` and receives a channel
//! 2. The session ticks, generates a `StreamEvent`, renders a `Fragment`
//! 3. The fragment is framed as a `PatchElements` message and sent
//! 4. The web layer turns each message into an SSE `Event` on the response
//!
//! # Modules
//!
//! - `connection`: `SessionRegistry` and the type-safe `SessionId`
//! - `manager`: session spawning, counting and draining
//! - `message`: datastar patch-elements framing
//! - `session`: the per-client tick loop
//! - `error`: the session error tree

pub mod connection;
pub mod error;
pub mod manager;
pub mod message;
pub mod session;

pub use manager::Manager;
