//! HTTP handlers for CV assistant endpoints.

use std::fmt::Display;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{
    DocumentImprover, ExportDocumentCommand, ExportDocumentError, ExportDocumentHandler,
    ExportOutcome, GetCurrentSectionError, GetCurrentSectionHandler, GetCurrentSectionQuery,
    GetDocumentError, GetDocumentHandler, GetDocumentQuery, ImproveDocumentCommand,
    ImproveDocumentError, ImproveDocumentHandler, ProcessInputCommand, ProcessInputError,
    ProcessInputHandler, SessionLocks, StartSessionCommand, StartSessionError,
    StartSessionHandler, UpdateDocumentCommand, UpdateDocumentError, UpdateDocumentHandler,
};
use crate::domain::conversation::ConversationEngine;
use crate::domain::cv::CvDocument;
use crate::domain::foundation::SessionId;
use crate::ports::{CvRenderer, CvTemplate, FieldExtractor, SessionStore, TextEnhancer};

use super::dto::{
    ErrorResponse, ExportQuery, ImproveResponse, MessageRequest, MessageResponse, SectionView,
    StartSessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CvHandlers {
    start_handler: Arc<StartSessionHandler>,
    input_handler: Arc<ProcessInputHandler>,
    section_handler: Arc<GetCurrentSectionHandler>,
    get_document_handler: Arc<GetDocumentHandler>,
    update_document_handler: Arc<UpdateDocumentHandler>,
    improve_handler: Arc<ImproveDocumentHandler>,
    export_handler: Arc<ExportDocumentHandler>,
    default_template: CvTemplate,
}

impl CvHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_handler: Arc<StartSessionHandler>,
        input_handler: Arc<ProcessInputHandler>,
        section_handler: Arc<GetCurrentSectionHandler>,
        get_document_handler: Arc<GetDocumentHandler>,
        update_document_handler: Arc<UpdateDocumentHandler>,
        improve_handler: Arc<ImproveDocumentHandler>,
        export_handler: Arc<ExportDocumentHandler>,
    ) -> Self {
        Self {
            start_handler,
            input_handler,
            section_handler,
            get_document_handler,
            update_document_handler,
            improve_handler,
            export_handler,
            default_template: CvTemplate::default(),
        }
    }

    /// Wires every handler over one set of ports, sharing a single
    /// session lock table.
    pub fn from_ports(
        store: Arc<dyn SessionStore>,
        extractor: Arc<dyn FieldExtractor>,
        enhancer: Arc<dyn TextEnhancer>,
        renderer: Arc<dyn CvRenderer>,
        engine: Arc<ConversationEngine>,
    ) -> Self {
        let locks = Arc::new(SessionLocks::new());
        let improver = Arc::new(DocumentImprover::new(enhancer));

        Self::new(
            Arc::new(StartSessionHandler::new(
                store.clone(),
                engine.clone(),
                locks.clone(),
            )),
            Arc::new(ProcessInputHandler::new(
                store.clone(),
                extractor,
                improver.clone(),
                engine,
                locks.clone(),
            )),
            Arc::new(GetCurrentSectionHandler::new(store.clone())),
            Arc::new(GetDocumentHandler::new(store.clone())),
            Arc::new(UpdateDocumentHandler::new(store.clone(), locks.clone())),
            Arc::new(ImproveDocumentHandler::new(store.clone(), improver, locks)),
            Arc::new(ExportDocumentHandler::new(store, renderer)),
        )
    }

    /// Template used when an export request names none.
    pub fn with_default_template(mut self, template: CvTemplate) -> Self {
        self.default_template = template;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions/:id - Start or resume a session
pub async fn start_session(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = StartSessionCommand {
        session_id: session_id.clone(),
    };

    match handlers.start_handler.handle(cmd).await {
        Ok(result) => {
            let status = if result.is_new {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let response = StartSessionResponse::new(session_id.as_str(), result);
            (status, Json(response)).into_response()
        }
        Err(e) => handle_start_error(e),
    }
}

/// POST /api/sessions/:id/messages - Process one user turn
pub async fn post_message(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ProcessInputCommand {
        session_id,
        text: req.text,
    };

    match handlers.input_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(MessageResponse::from(result))).into_response(),
        Err(e) => handle_input_error(e),
    }
}

/// GET /api/sessions/:id/section - Current position in the section flow
pub async fn get_current_section(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .section_handler
        .handle(GetCurrentSectionQuery { session_id })
        .await
    {
        Ok(section) => (StatusCode::OK, Json(SectionView::from(section))).into_response(),
        Err(e) => handle_section_error(e),
    }
}

/// GET /api/sessions/:id/document - The document collected so far
pub async fn get_document(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .get_document_handler
        .handle(GetDocumentQuery { session_id })
        .await
    {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => handle_get_document_error(e),
    }
}

/// PUT /api/sessions/:id/document - Replace the document wholesale
pub async fn update_document(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
    Json(document): Json<CvDocument>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdateDocumentCommand {
        session_id,
        document,
    };

    match handlers.update_document_handler.handle(cmd).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => handle_update_document_error(e),
    }
}

/// POST /api/sessions/:id/improve - Rewrite the document's prose
pub async fn improve_document(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .improve_handler
        .handle(ImproveDocumentCommand { session_id })
        .await
    {
        Ok(result) => (StatusCode::OK, Json(ImproveResponse::from(result))).into_response(),
        Err(e) => handle_improve_error(e),
    }
}

/// GET /api/sessions/:id/export?template= - Download the rendered CV
pub async fn export_document(
    State(handlers): State<CvHandlers>,
    Path(session_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let template = query
        .template
        .as_deref()
        .map(CvTemplate::from_name)
        .unwrap_or(handlers.default_template);

    let cmd = ExportDocumentCommand {
        session_id,
        template,
    };

    match handlers.export_handler.handle(cmd).await {
        Ok(ExportOutcome::Rendered(rendered)) => {
            let disposition = format!("attachment; filename=\"{}\"", rendered.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, rendered.content_type),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                rendered.content,
            )
                .into_response()
        }
        Ok(ExportOutcome::Blocked { missing, message }) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::export_blocked(&missing, message)),
        )
            .into_response(),
        Err(e) => handle_export_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_session_id(format!(
                "Invalid session ID: {}",
                e
            ))),
        )
            .into_response()
    })
}

fn session_not_found(id: &SessionId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::session_not_found(id.as_str())),
    )
        .into_response()
}

fn storage_failure(error: impl Display) -> Response {
    tracing::error!(error = %error, "session storage failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::storage("Session storage failed")),
    )
        .into_response()
}

fn handle_start_error(error: StartSessionError) -> Response {
    match error {
        StartSessionError::Storage(e) => storage_failure(e),
    }
}

fn handle_input_error(error: ProcessInputError) -> Response {
    match error {
        ProcessInputError::SessionNotFound(id) => session_not_found(&id),
        ProcessInputError::Storage(e) => storage_failure(e),
    }
}

fn handle_section_error(error: GetCurrentSectionError) -> Response {
    match error {
        GetCurrentSectionError::SessionNotFound(id) => session_not_found(&id),
        GetCurrentSectionError::Storage(e) => storage_failure(e),
    }
}

fn handle_get_document_error(error: GetDocumentError) -> Response {
    match error {
        GetDocumentError::SessionNotFound(id) => session_not_found(&id),
        GetDocumentError::Storage(e) => storage_failure(e),
    }
}

fn handle_update_document_error(error: UpdateDocumentError) -> Response {
    match error {
        UpdateDocumentError::SessionNotFound(id) => session_not_found(&id),
        UpdateDocumentError::Invalid(rejection) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_record(
                rejection.section,
                rejection.reason.to_string(),
            )),
        )
            .into_response(),
        UpdateDocumentError::Storage(e) => storage_failure(e),
    }
}

fn handle_improve_error(error: ImproveDocumentError) -> Response {
    match error {
        ImproveDocumentError::SessionNotFound(id) => session_not_found(&id),
        ImproveDocumentError::Storage(e) => storage_failure(e),
    }
}

fn handle_export_error(error: ExportDocumentError) -> Response {
    match error {
        ExportDocumentError::SessionNotFound(id) => session_not_found(&id),
        ExportDocumentError::Storage(e) => storage_failure(e),
        ExportDocumentError::Render(e) => {
            tracing::error!(error = %e, "CV rendering failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::render_failed(e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cv::{DocumentRejection, FieldRejection, Section};
    use crate::ports::{RenderError, SessionStoreError};

    fn id() -> SessionId {
        SessionId::new("user-42").unwrap()
    }

    #[test]
    fn malformed_session_id_maps_to_400() {
        let response = parse_session_id("bad/../id").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn well_formed_session_id_parses() {
        assert_eq!(parse_session_id("user-42").unwrap(), id());
    }

    #[test]
    fn session_not_found_maps_to_404() {
        let response = handle_input_error(ProcessInputError::SessionNotFound(id()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = handle_get_document_error(GetDocumentError::SessionNotFound(id()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_document_maps_to_400() {
        let error = UpdateDocumentError::Invalid(DocumentRejection {
            section: Section::Skills,
            reason: FieldRejection::EmptySkill,
        });
        assert_eq!(
            handle_update_document_error(error).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_failure_maps_to_500() {
        let error = StartSessionError::Storage(SessionStoreError::IoError("disk full".into()));
        assert_eq!(
            handle_start_error(error).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn render_failure_maps_to_500() {
        let error = ExportDocumentError::Render(RenderError::Failed("template broke".into()));
        assert_eq!(
            handle_export_error(error).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
