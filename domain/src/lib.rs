//! Stream event generation and rendering.
//!
//! - `entropy`: the secure random byte source behind every event
//! - `event`: `StreamEvent`, a fixed-width random value with a hex encoding
//! - `fragment`: markup rendering of an event targeting the `feed` element
//! - `error`: the domain error tree

pub mod entropy;
pub mod error;
pub mod event;
pub mod fragment;

pub use entropy::{EntropySource, OsEntropy, EVENT_LEN};
pub use event::{StreamEvent, HEX_LEN};
pub use fragment::{Fragment, FEED_ELEMENT_ID};
