//! Application state.

use std::sync::Arc;

use coursebook_store::Store;

use crate::auth::TokenIssuer;
use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Bearer token signer and verifier.
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_expires_days);
        Self {
            store,
            config,
            tokens,
        }
    }
}
