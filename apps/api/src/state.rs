use crate::generation::GenerationClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions. Each one is the hosting view for a single tailoring workflow.
    pub sessions: SessionStore,
    /// Generation client over the configured transport (HTTP in production, a fake in tests).
    pub generator: GenerationClient,
}
