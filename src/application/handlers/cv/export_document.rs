//! ExportDocumentHandler - Renders a finished CV.
//!
//! Export is guarded by the completeness check: while any export-required
//! section is missing, the renderer is never called and the caller gets the
//! list of missing sections instead.

use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::conversation::responses;
use crate::domain::cv::Section;
use crate::domain::foundation::SessionId;
use crate::ports::{CvRenderer, CvTemplate, RenderError, RenderedCv, SessionStore, SessionStoreError};

#[derive(Debug, Clone)]
pub struct ExportDocumentCommand {
    pub session_id: SessionId,
    pub template: CvTemplate,
}

/// Outcome of an export attempt.
#[derive(Debug, Clone)]
pub enum ExportOutcome {
    /// Required sections are missing; nothing was rendered.
    Blocked { missing: Vec<Section>, message: String },
    Rendered(RenderedCv),
}

#[derive(Debug, Error)]
pub enum ExportDocumentError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

pub struct ExportDocumentHandler {
    store: Arc<dyn SessionStore>,
    renderer: Arc<dyn CvRenderer>,
}

impl ExportDocumentHandler {
    pub fn new(store: Arc<dyn SessionStore>, renderer: Arc<dyn CvRenderer>) -> Self {
        Self { store, renderer }
    }

    pub async fn handle(&self, cmd: ExportDocumentCommand) -> Result<ExportOutcome, ExportDocumentError> {
        let session = self
            .store
            .load(&cmd.session_id)
            .await?
            .ok_or_else(|| ExportDocumentError::SessionNotFound(cmd.session_id.clone()))?;

        let missing = session.document.missing_for_export();
        if !missing.is_empty() {
            info!(session_id = %cmd.session_id, ?missing, "export blocked");
            let message = responses::export_blocked(&missing);
            return Ok(ExportOutcome::Blocked { missing, message });
        }

        let rendered = self
            .renderer
            .render(&session.document, cmd.template)
            .await
            .map_err(|e| {
                error!(session_id = %cmd.session_id, error = %e, "render failed");
                e
            })?;

        info!(
            session_id = %cmd.session_id,
            template = %cmd.template,
            bytes = rendered.content.len(),
            "document exported"
        );
        Ok(ExportOutcome::Rendered(rendered))
    }
}
