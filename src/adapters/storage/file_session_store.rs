//! File-based Session Store Adapter
//!
//! Stores each conversation session as one YAML file on disk,
//! `<sessions_dir>/<session_id>.yaml`. Session ids are restricted to
//! `[A-Za-z0-9_-]`, so they are always safe file names.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for conversation sessions
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`.
    ///
    /// The directory is created lazily on first save.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn session_file_path(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    fn temp_file_path(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!(".{}.yaml.tmp", id))
    }

    async fn ensure_dir(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<ConversationSession>, SessionStoreError> {
        let file_path = self.session_file_path(id);

        let yaml = match fs::read_to_string(&file_path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStoreError::IoError(e.to_string())),
        };

        let session = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(session))
    }

    async fn save(&self, session: &ConversationSession) -> Result<(), SessionStoreError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        // Write beside the target, then rename over it.
        let temp_path = self.temp_file_path(&session.session_id);
        fs::write(&temp_path, yaml)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;
        fs::rename(&temp_path, self.session_file_path(&session.session_id))
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        debug!(session_id = %session.session_id, "session saved");
        Ok(())
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        fs::try_exists(self.session_file_path(id))
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        match fs::remove_file(self.session_file_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionStoreError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cv::{PersonalInfo, Section};
    use tempfile::TempDir;

    fn session(id: &str) -> ConversationSession {
        ConversationSession::new(SessionId::new(id).unwrap())
    }

    #[tokio::test]
    async fn load_of_unknown_id_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        let loaded = store.load(&SessionId::new("nobody").unwrap()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        let mut original = session("abc-123");
        original.record_user("Jane Doe, jane@example.com, +255712345678");
        original.document.personal_info = Some(PersonalInfo {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            phone: "+255712345678".into(),
            address: String::new(),
        });
        original.current_section = Some(Section::Summary);

        store.save(&original).await.unwrap();
        let loaded = store.load(&original.session_id).await.unwrap().unwrap();

        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn completed_session_persists_null_section() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        let mut done = session("finished");
        done.current_section = None;
        store.save(&done).await.unwrap();

        let yaml = std::fs::read_to_string(temp_dir.path().join("finished.yaml")).unwrap();
        assert!(yaml.contains("current_section: null"));
        let loaded = store.load(&done.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.current_section, None);
    }

    #[tokio::test]
    async fn save_is_idempotent_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        let s = session("twice");

        store.save(&s).await.unwrap();
        store.save(&s).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["twice.yaml".to_string()]);
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("nested").join("sessions"));

        store.save(&session("s1")).await.unwrap();
        assert!(store.exists(&SessionId::new("s1").unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_and_tolerates_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        let s = session("gone");

        store.save(&s).await.unwrap();
        store.delete(&s.session_id).await.unwrap();
        assert!(!store.exists(&s.session_id).await.unwrap());
        store.delete(&s.session_id).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("broken.yaml"), "current_section: [unclosed").unwrap();

        let err = store.load(&SessionId::new("broken").unwrap()).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::DeserializationFailed(_)));
    }
}
