//! Document improvement - rewrites the free-text parts of a CV.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::cv::validators::{validate_experience, validate_skills, validate_summary};
use crate::domain::cv::{CvDocument, FieldRejection};
use crate::domain::foundation::SessionId;
use crate::ports::{EnhanceError, SessionStore, SessionStoreError, TextEnhancer};

use super::SessionLocks;

/// Rewrites the summary, experience descriptions and skills of a document
/// in a single batch.
///
/// Improvement is all-or-nothing: any enhancer failure leaves the document
/// untouched. A rewrite that fails its section's validator keeps the
/// original text.
pub struct DocumentImprover {
    enhancer: Arc<dyn TextEnhancer>,
}

impl DocumentImprover {
    pub fn new(enhancer: Arc<dyn TextEnhancer>) -> Self {
        Self { enhancer }
    }

    /// Best-effort rewrite of a freshly accepted summary.
    pub async fn enhance_summary(&self, summary: &str) -> String {
        self.enhancer.enhance_text(summary).await
    }

    pub async fn improve(&self, document: &CvDocument) -> Result<CvDocument, EnhanceError> {
        let summary = document
            .summary
            .as_deref()
            .filter(|s| !s.trim().is_empty());
        let descriptions: Vec<usize> = document
            .experience
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.description.trim().is_empty())
            .map(|(i, _)| i)
            .collect();
        let skills = document.skills.join(", ");

        let mut texts = Vec::new();
        if let Some(summary) = summary {
            texts.push(summary.to_string());
        }
        texts.extend(descriptions.iter().map(|&i| document.experience[i].description.clone()));
        if !skills.is_empty() {
            texts.push(skills.clone());
        }

        if texts.is_empty() {
            return Ok(document.clone());
        }

        let mut rewritten = self.enhancer.try_enhance_batch(&texts).await?.into_iter();
        let mut improved = document.clone();
        // Blank rewrites keep the original text.
        let mut next = |original: &str| {
            rewritten
                .next()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| original.to_string())
        };

        if let Some(summary) = summary {
            let rewrite = next(summary);
            improved.summary = Some(valid_or(rewrite, summary.to_string(), |s| validate_summary(s)));
        }
        for &i in &descriptions {
            let original = &document.experience[i];
            let mut rewrite = original.clone();
            rewrite.description = next(&original.description);
            improved.experience[i] = valid_or(rewrite, original.clone(), validate_experience);
        }
        if !skills.is_empty() {
            let list: Vec<String> = next(&skills)
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            improved.skills = valid_or(list, document.skills.clone(), |s| validate_skills(s));
        }

        Ok(improved)
    }
}

/// Keeps `rewrite` only when it passes `check`.
fn valid_or<T>(
    rewrite: T,
    original: T,
    check: impl FnOnce(&T) -> Result<(), FieldRejection>,
) -> T {
    match check(&rewrite) {
        Ok(()) => rewrite,
        Err(reason) => {
            debug!(%reason, "rewrite rejected, keeping original");
            original
        }
    }
}

/// Command to improve a session's document outside the conversation.
#[derive(Debug, Clone)]
pub struct ImproveDocumentCommand {
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct ImproveDocumentResult {
    pub document: CvDocument,
    /// False when the enhancer failed and the document was left as it was.
    pub applied: bool,
}

#[derive(Debug, Error)]
pub enum ImproveDocumentError {
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("session storage failed: {0}")]
    Storage(#[from] SessionStoreError),
}

pub struct ImproveDocumentHandler {
    store: Arc<dyn SessionStore>,
    improver: Arc<DocumentImprover>,
    locks: Arc<SessionLocks>,
}

impl ImproveDocumentHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        improver: Arc<DocumentImprover>,
        locks: Arc<SessionLocks>,
    ) -> Self {
        Self { store, improver, locks }
    }

    pub async fn handle(
        &self,
        cmd: ImproveDocumentCommand,
    ) -> Result<ImproveDocumentResult, ImproveDocumentError> {
        let _guard = self.locks.acquire(&cmd.session_id).await;

        let mut session = self
            .store
            .load(&cmd.session_id)
            .await?
            .ok_or_else(|| ImproveDocumentError::SessionNotFound(cmd.session_id.clone()))?;

        match self.improver.improve(&session.document).await {
            Ok(document) => {
                session.document = document;
                session.touch();
                self.store.save(&session).await?;
                info!(session_id = %cmd.session_id, "document improved");
                Ok(ImproveDocumentResult {
                    document: session.document,
                    applied: true,
                })
            }
            Err(e) => {
                warn!(session_id = %cmd.session_id, error = %e, "document improvement failed");
                Ok(ImproveDocumentResult {
                    document: session.document,
                    applied: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{LlmAssistant, MockAIProvider, MockError};
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::conversation::ConversationSession;
    use crate::domain::cv::ExperienceEntry;

    fn improver(provider: &MockAIProvider) -> DocumentImprover {
        DocumentImprover::new(Arc::new(LlmAssistant::new(Arc::new(provider.clone()))))
    }

    fn document() -> CvDocument {
        let mut document = CvDocument::default();
        document.summary = Some("teacher 10 years".into());
        document.experience.push(ExperienceEntry {
            company: "Acme".into(),
            role: "Manager".into(),
            start_date: "01/2020".into(),
            end_date: "present".into(),
            description: "ran shop".into(),
        });
        document.skills = vec!["rust".into(), "sql".into()];
        document
    }

    mod improver {
        use super::*;

        #[tokio::test]
        async fn rewrites_all_texts_in_one_call() {
            let provider = MockAIProvider::new().with_response(
                r#"["Teacher with ten years of experience.", "Ran a busy retail shop.", "Rust, SQL, Teaching"]"#,
            );

            let improved = improver(&provider).improve(&document()).await.unwrap();

            assert_eq!(provider.call_count(), 1);
            assert_eq!(improved.summary.as_deref(), Some("Teacher with ten years of experience."));
            assert_eq!(improved.experience[0].description, "Ran a busy retail shop.");
            assert_eq!(improved.experience[0].company, "Acme");
            assert_eq!(improved.skills, vec!["Rust", "SQL", "Teaching"]);
        }

        #[tokio::test]
        async fn failure_is_all_or_nothing() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".into(),
            });
            assert!(improver(&provider).improve(&document()).await.is_err());
        }

        #[tokio::test]
        async fn count_mismatch_is_a_failure() {
            let provider = MockAIProvider::new().with_response(r#"["only one"]"#);
            let err = improver(&provider).improve(&document()).await.unwrap_err();
            assert!(matches!(err, EnhanceError::CountMismatch { .. }));
        }

        #[tokio::test]
        async fn nothing_to_improve_skips_the_enhancer() {
            let provider = MockAIProvider::new();
            let empty = CvDocument::default();

            let improved = improver(&provider).improve(&empty).await.unwrap();

            assert_eq!(improved, empty);
            assert_eq!(provider.call_count(), 0);
        }

        #[tokio::test]
        async fn rewrites_failing_validation_keep_originals() {
            let too_long = format!("Teacher {}", "with many years ".repeat(40));
            let provider = MockAIProvider::new().with_response(
                serde_json::to_string(&[too_long.as_str(), "Ran a busy retail shop.", " , "])
                    .unwrap(),
            );

            let improved = improver(&provider).improve(&document()).await.unwrap();

            assert_eq!(improved.summary.as_deref(), Some("teacher 10 years"));
            assert_eq!(improved.experience[0].description, "Ran a busy retail shop.");
            assert_eq!(improved.skills, vec!["rust", "sql"]);
        }

        #[tokio::test]
        async fn enhance_summary_falls_back_to_original() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "down".into(),
            });
            let summary = improver(&provider).enhance_summary("teacher 10 years").await;
            assert_eq!(summary, "teacher 10 years");
        }

        #[tokio::test]
        async fn blank_rewrite_keeps_original() {
            let provider = MockAIProvider::new().with_response(r#"["", "Ran a shop.", "Rust, SQL"]"#);
            let improved = improver(&provider).improve(&document()).await.unwrap();
            assert_eq!(improved.summary.as_deref(), Some("teacher 10 years"));
        }
    }

    mod handler {
        use super::*;

        async fn setup(provider: &MockAIProvider) -> (ImproveDocumentHandler, Arc<InMemorySessionStore>, SessionId) {
            let store = Arc::new(InMemorySessionStore::new());
            let id = SessionId::new("improve-me").unwrap();
            let mut session = ConversationSession::new(id.clone());
            session.document = document();
            store.save(&session).await.unwrap();

            let handler = ImproveDocumentHandler::new(
                store.clone(),
                Arc::new(improver(provider)),
                Arc::new(SessionLocks::new()),
            );
            (handler, store, id)
        }

        #[tokio::test]
        async fn applies_and_persists_improvement() {
            let provider = MockAIProvider::new()
                .with_response(r#"["Teacher of ten years.", "Ran a shop.", "Rust"]"#);
            let (handler, store, id) = setup(&provider).await;

            let result = handler
                .handle(ImproveDocumentCommand { session_id: id.clone() })
                .await
                .unwrap();

            assert!(result.applied);
            let saved = store.load(&id).await.unwrap().unwrap();
            assert_eq!(saved.document.summary.as_deref(), Some("Teacher of ten years."));
        }

        #[tokio::test]
        async fn failed_improvement_leaves_document() {
            let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
            let (handler, store, id) = setup(&provider).await;

            let result = handler
                .handle(ImproveDocumentCommand { session_id: id.clone() })
                .await
                .unwrap();

            assert!(!result.applied);
            assert_eq!(result.document, document());
            assert_eq!(store.load(&id).await.unwrap().unwrap().document, document());
        }

        #[tokio::test]
        async fn unknown_session_is_not_found() {
            let provider = MockAIProvider::new();
            let (handler, _, _) = setup(&provider).await;

            let err = handler
                .handle(ImproveDocumentCommand {
                    session_id: SessionId::new("nobody").unwrap(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ImproveDocumentError::SessionNotFound(_)));
        }
    }
}
