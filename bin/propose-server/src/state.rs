//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use propose_core::ProposalPipeline;

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Stateless pipeline; one instance serves every request.
    pub pipeline: ProposalPipeline,
}
