//! Session Store Port - Interface for persisting conversation sessions.
//!
//! One record per session id holding `{history, current_section, document}`.
//! Loading an id that was never saved is not an error: it returns `None`,
//! which callers treat as "create new".

use async_trait::async_trait;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for loading and saving sessions.
///
/// # Contract
///
/// - `save` then `load` of the same id yields an equal session
/// - `save` is idempotent: saving the same session twice leaves one record
/// - `load` of an unknown id returns `Ok(None)`
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, or `None` if the id was never saved.
    async fn load(&self, id: &SessionId) -> Result<Option<ConversationSession>, SessionStoreError>;

    /// Save (create or replace) a session under its own id.
    async fn save(&self, session: &ConversationSession) -> Result<(), SessionStoreError>;

    /// Check if a session exists.
    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError>;

    /// Delete a session. Deleting an unknown id is not an error.
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
