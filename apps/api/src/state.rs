use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::{Config, Credential};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(analyzer: Arc<Analyzer>, config: Config) -> Self {
        Self {
            sessions: SessionStore::new(Arc::clone(&analyzer)),
            analyzer,
            config,
        }
    }

    /// `true` when no live credential is configured and mock data is served.
    pub fn demo_mode(&self) -> bool {
        self.config.credential == Credential::Unconfigured
    }
}
