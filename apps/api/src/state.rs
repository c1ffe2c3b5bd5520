use std::sync::Arc;

use crate::scoring::store::ScoreStore;
use crate::verification::pipeline::ProofVerifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed in production, in-memory when no DATABASE_URL is configured.
    pub store: Arc<dyn ScoreStore>,
    pub verifier: Arc<ProofVerifier>,
}
