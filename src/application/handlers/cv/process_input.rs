//! ProcessInputHandler - The single message-handling entry point.
//!
//! One turn: load the session, run the engine, call the extraction,
//! enhancement or improvement collaborator when the engine asks for it,
//! save, reply.
//! The session is saved on every path that reaches the engine, rejections
//! included.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::conversation::{ConversationEngine, TurnEvent, TurnStep};
use crate::domain::cv::Section;
use crate::domain::foundation::SessionId;
use crate::ports::{FieldExtractor, SessionStore, SessionStoreError};

use super::{DocumentImprover, SessionLocks};

/// Command carrying one user message.
#[derive(Debug, Clone)]
pub struct ProcessInputCommand {
    pub session_id: SessionId,
    pub text: String,
}

/// Result of one turn.
#[derive(Debug, Clone)]
pub struct ProcessInputResult {
    pub response: String,
    pub event: TurnEvent,
    /// `None` once every section has been visited.
    pub current_section: Option<Section>,
}

#[derive(Debug, Error)]
pub enum ProcessInputError {
    /// The session was never started.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),
}

/// Handler for user messages.
pub struct ProcessInputHandler {
    store: Arc<dyn SessionStore>,
    extractor: Arc<dyn FieldExtractor>,
    improver: Arc<DocumentImprover>,
    engine: Arc<ConversationEngine>,
    locks: Arc<SessionLocks>,
}

impl ProcessInputHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        extractor: Arc<dyn FieldExtractor>,
        improver: Arc<DocumentImprover>,
        engine: Arc<ConversationEngine>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self {
            store,
            extractor,
            improver,
            engine,
            locks,
        }
    }

    pub async fn handle(&self, cmd: ProcessInputCommand) -> Result<ProcessInputResult, ProcessInputError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        // 1. Load
        let mut session = self
            .store
            .load(&cmd.session_id)
            .await?
            .ok_or_else(|| ProcessInputError::SessionNotFound(cmd.session_id.clone()))?;

        debug!(session_id = %cmd.session_id, text = %cmd.text, "processing input");

        // 2. Run the turn, consulting collaborators when asked
        let outcome = match self.engine.begin_turn(&mut session, &cmd.text) {
            TurnStep::Done(outcome) => outcome,
            TurnStep::NeedsExtraction { section, text } => {
                let extraction = match self
                    .extractor
                    .extract_with_intent(&text, section, &session.document)
                    .await
                {
                    Ok(extraction) => Some(extraction),
                    Err(e) => {
                        warn!(session_id = %cmd.session_id, section = %section, error = %e, "extraction failed");
                        None
                    }
                };
                self.engine.complete_extraction(&mut session, extraction)
            }
            TurnStep::NeedsSummaryEnhancement { summary } => {
                let enhanced = self.improver.enhance_summary(&summary).await;
                self.engine.complete_summary(&mut session, &summary, &enhanced)
            }
            TurnStep::NeedsImprovement => {
                let improved = match self.improver.improve(&session.document).await {
                    Ok(document) => Some(document),
                    Err(e) => {
                        warn!(session_id = %cmd.session_id, error = %e, "improvement failed");
                        None
                    }
                };
                self.engine.complete_improvement(&mut session, improved)
            }
        };

        // 3. Persist
        self.store.save(&session).await?;

        debug!(
            session_id = %cmd.session_id,
            event = ?outcome.event,
            section = ?session.current_section,
            "turn complete"
        );

        Ok(ProcessInputResult {
            response: outcome.response,
            event: outcome.event,
            current_section: session.current_section,
        })
    }
}
