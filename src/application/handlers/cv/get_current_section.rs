//! GetCurrentSectionHandler - Query for where a session is in the flow.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::cv::Section;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Clone)]
pub struct GetCurrentSectionQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Error)]
pub enum GetCurrentSectionError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),
}

pub struct GetCurrentSectionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetCurrentSectionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Returns the active section, or `None` when every section is done.
    pub async fn handle(&self, query: GetCurrentSectionQuery) -> Result<Option<Section>, GetCurrentSectionError> {
        let session = self
            .store
            .load(&query.session_id)
            .await?
            .ok_or(GetCurrentSectionError::SessionNotFound(query.session_id))?;

        Ok(session.current_section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::conversation::ConversationSession;

    #[tokio::test]
    async fn reports_section_and_completion() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = ConversationSession::new(SessionId::new("where").unwrap());
        store.save(&session).await.unwrap();
        let handler = GetCurrentSectionHandler::new(store.clone());
        let query = || GetCurrentSectionQuery {
            session_id: SessionId::new("where").unwrap(),
        };

        assert_eq!(handler.handle(query()).await.unwrap(), Some(Section::PersonalInfo));

        session.current_section = None;
        store.save(&session).await.unwrap();
        assert_eq!(handler.handle(query()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = GetCurrentSectionHandler::new(Arc::new(InMemorySessionStore::new()));
        let err = handler
            .handle(GetCurrentSectionQuery {
                session_id: SessionId::new("nope").unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GetCurrentSectionError::SessionNotFound(_)));
    }
}
