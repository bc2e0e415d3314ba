pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

/// Uploaded resumes larger than this are rejected by the extractor.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Inputs
        .route(
            "/api/v1/sessions/:id/resume",
            post(handlers::handle_upload_resume).put(handlers::handle_set_resume_text),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            put(handlers::handle_set_job_description),
        )
        .route(
            "/api/v1/sessions/:id/generate",
            post(handlers::handle_generate),
        )
        // Editing
        .route("/api/v1/sessions/:id/edit", post(handlers::handle_begin_edit))
        .route(
            "/api/v1/sessions/:id/edit/commit",
            post(handlers::handle_commit_edit),
        )
        .route(
            "/api/v1/sessions/:id/edit/discard",
            post(handlers::handle_discard_edit),
        )
        .route(
            "/api/v1/sessions/:id/document/fields/:field",
            put(handlers::handle_set_field),
        )
        .route(
            "/api/v1/sessions/:id/document/:collection",
            post(handlers::handle_append_item),
        )
        .route(
            "/api/v1/sessions/:id/document/:collection/:index",
            axum::routing::patch(handlers::handle_update_item)
                .delete(handlers::handle_remove_item),
        )
        // Export
        .route(
            "/api/v1/sessions/:id/export/:format",
            get(handlers::handle_export),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
