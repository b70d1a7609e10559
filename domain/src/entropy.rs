//! Cryptographically secure random bytes for stream events.

use crate::error::Error;
use log::*;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes carried by each stream event.
pub const EVENT_LEN: usize = 3;

/// A source of random bytes for stream events.
///
/// Implementations must be safe to share across sessions. Each call returns
/// fresh bytes; no state is carried from one call to the next that another
/// session could observe.
pub trait EntropySource: Send + Sync {
    /// Returns the next `EVENT_LEN` random bytes, or `EntropyUnavailable` when
    /// the underlying source cannot supply them.
    fn next(&self) -> Result<[u8; EVENT_LEN], Error>;
}

/// Entropy drawn from the operating system's secure random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next(&self) -> Result<[u8; EVENT_LEN], Error> {
        let mut bytes = [0u8; EVENT_LEN];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            warn!("OS random source failed: {e}");
            e
        })?;
        Ok(bytes)
    }
}
