//! HTTP routes for CV assistant endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    export_document, get_current_section, get_document, improve_document, post_message,
    start_session, update_document, CvHandlers,
};

/// Creates the CV assistant router, to be nested under `/api/sessions`.
pub fn cv_routes(handlers: CvHandlers) -> Router {
    Router::new()
        .route("/:id", post(start_session))
        .route("/:id/messages", post(post_message))
        .route("/:id/section", get(get_current_section))
        .route("/:id/document", get(get_document).put(update_document))
        .route("/:id/improve", post(improve_document))
        .route("/:id/export", get(export_document))
        .with_state(handlers)
}
