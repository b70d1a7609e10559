//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the stream endpoint.
//! The session machinery (Manager, Session, message framing) lives in the
//! `sse` crate.

pub mod handler;
