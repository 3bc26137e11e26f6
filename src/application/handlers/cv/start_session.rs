//! StartSessionHandler - Opens a new session or resumes an existing one.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::domain::conversation::{ConversationEngine, ConversationSession};
use crate::domain::cv::Section;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

use super::SessionLocks;

/// Command to start (or resume) a session.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub session_id: SessionId,
}

/// Result of starting a session.
#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub response: String,
    /// False when an existing session was resumed.
    pub is_new: bool,
    pub current_section: Option<Section>,
}

#[derive(Debug, Error)]
pub enum StartSessionError {
    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),
}

/// Handler for starting sessions.
///
/// Starting is idempotent with respect to the flow: a known id keeps its
/// section and document and only gets a welcome-back message.
pub struct StartSessionHandler {
    store: Arc<dyn SessionStore>,
    engine: Arc<ConversationEngine>,
    locks: Arc<SessionLocks>,
}

impl StartSessionHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        engine: Arc<ConversationEngine>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self { store, engine, locks }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<StartSessionResult, StartSessionError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        let (mut session, is_new) = match self.store.load(&cmd.session_id).await? {
            Some(session) => (session, false),
            None => (ConversationSession::new(cmd.session_id.clone()), true),
        };

        let response = self.engine.start(&mut session, is_new);
        self.store.save(&session).await?;

        info!(
            session_id = %cmd.session_id,
            is_new,
            section = ?session.current_section,
            "session started"
        );

        Ok(StartSessionResult {
            response,
            is_new,
            current_section: session.current_section,
        })
    }
}
