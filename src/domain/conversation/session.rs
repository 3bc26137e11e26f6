//! Conversation session - the per-id state persisted between turns.

use serde::{Deserialize, Serialize};

use crate::domain::cv::{CvDocument, Section};
use crate::domain::foundation::{SessionId, Timestamp};

use super::message::HistoryEntry;
use super::position::FlowPosition;

/// Everything known about one conversation.
///
/// Persisted as `{session_id, current_section, history, document, ...}`;
/// `current_section: null` means every section has been visited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: SessionId,
    pub current_section: Option<Section>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub document: CvDocument,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationSession {
    /// Creates a fresh session at the first section with an empty document.
    pub fn new(session_id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            current_section: FlowPosition::initial().current_section(),
            history: Vec::new(),
            document: CvDocument::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn position(&self) -> FlowPosition {
        FlowPosition::from_current_section(self.current_section)
    }

    pub fn set_position(&mut self, position: FlowPosition) {
        self.current_section = position.current_section();
    }

    pub fn record_user(&mut self, text: impl Into<String>) {
        self.history.push(HistoryEntry::user(text));
    }

    pub fn record_assistant(&mut self, text: impl Into<String>) {
        self.history.push(HistoryEntry::assistant(text));
    }

    /// Marks the session as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
