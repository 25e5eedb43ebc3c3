//! Application state for the HTTP server.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::db::repository::ObservationRepository;
use crate::services::PositionService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Observation store
    pub repository: Arc<dyn ObservationRepository>,
    pub positions: Arc<PositionService>,
    /// Expected `X-API-Key` value. `None` accepts any non-blank key.
    pub api_key: Option<Arc<str>>,
    /// Cancelled when the server shuts down; each request works on a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(repository: Arc<dyn ObservationRepository>, positions: PositionService) -> Self {
        Self {
            repository,
            positions: Arc::new(positions),
            api_key: None,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<&str>) -> Self {
        self.api_key = api_key.map(Arc::from);
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Token for a single request, cancelled together with the server.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
