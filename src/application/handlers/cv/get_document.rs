//! GetDocumentHandler - Query for a session's accumulated CV.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::cv::CvDocument;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Error)]
pub enum GetDocumentError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),
}

pub struct GetDocumentHandler {
    store: Arc<dyn SessionStore>,
}

impl GetDocumentHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<CvDocument, GetDocumentError> {
        self.store
            .load(&query.session_id)
            .await?
            .map(|session| session.document)
            .ok_or(GetDocumentError::SessionNotFound(query.session_id))
    }
}
