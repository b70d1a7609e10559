use bytes::Bytes;
use config::Config;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state shared by every request handler
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sse_manager: Arc<sse::Manager>,
    landing_page: Bytes,
}

impl AppState {
    /// `landing_page` is rendered once at startup and only read afterwards.
    pub fn new(app_config: Config, sse_manager: &Arc<sse::Manager>, landing_page: Bytes) -> Self {
        Self {
            config: app_config,
            sse_manager: Arc::clone(sse_manager),
            landing_page,
        }
    }

    /// Cheap handle to the landing page bytes; clones share one buffer.
    pub fn landing_page(&self) -> Bytes {
        self.landing_page.clone()
    }
}
