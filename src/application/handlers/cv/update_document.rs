//! UpdateDocumentHandler - Replaces a session's CV wholesale.
//!
//! Used by post-completion actions and by front-ends that edit the CV
//! directly. Every record must pass its section's validator; a rejected
//! document leaves the stored one untouched. The conversation position is
//! left alone.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::cv::{validate_document, CvDocument, DocumentRejection};
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

use super::SessionLocks;

#[derive(Debug, Clone)]
pub struct UpdateDocumentCommand {
    pub session_id: SessionId,
    pub document: CvDocument,
}

#[derive(Debug, Error)]
pub enum UpdateDocumentError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("invalid {0}")]
    Invalid(DocumentRejection),

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),
}

pub struct UpdateDocumentHandler {
    store: Arc<dyn SessionStore>,
    locks: Arc<SessionLocks>,
}

impl UpdateDocumentHandler {
    pub fn new(store: Arc<dyn SessionStore>, locks: Arc<SessionLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn handle(&self, cmd: UpdateDocumentCommand) -> Result<CvDocument, UpdateDocumentError> {
        if let Err(rejection) = validate_document(&cmd.document) {
            warn!(session_id = %cmd.session_id, %rejection, "document update rejected");
            return Err(UpdateDocumentError::Invalid(rejection));
        }

        let _guard = self.locks.acquire(&cmd.session_id).await;

        let mut session = self
            .store
            .load(&cmd.session_id)
            .await?
            .ok_or_else(|| UpdateDocumentError::SessionNotFound(cmd.session_id.clone()))?;

        session.document = cmd.document;
        session.touch();
        self.store.save(&session).await?;

        info!(session_id = %cmd.session_id, "document replaced");
        Ok(session.document)
    }
}
