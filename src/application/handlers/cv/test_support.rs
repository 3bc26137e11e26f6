//! Shared fixtures for handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::conversation::ConversationSession;
use crate::domain::cv::{CvDocument, EducationEntry, ExperienceEntry, PersonalInfo};
use crate::domain::foundation::SessionId;
use crate::ports::{CvRenderer, CvTemplate, RenderError, RenderedCv, SessionStore, SessionStoreError};

/// A store whose every operation fails.
pub struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn load(&self, _id: &SessionId) -> Result<Option<ConversationSession>, SessionStoreError> {
        Err(SessionStoreError::IoError("disk unavailable".into()))
    }

    async fn save(&self, _session: &ConversationSession) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::IoError("disk unavailable".into()))
    }

    async fn exists(&self, _id: &SessionId) -> Result<bool, SessionStoreError> {
        Err(SessionStoreError::IoError("disk unavailable".into()))
    }

    async fn delete(&self, _id: &SessionId) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::IoError("disk unavailable".into()))
    }
}

/// Renderer that counts its calls.
#[derive(Default)]
pub struct CountingRenderer {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingRenderer {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CvRenderer for CountingRenderer {
    async fn render(&self, _document: &CvDocument, template: CvTemplate) -> Result<RenderedCv, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RenderError::Failed("template engine crashed".into()));
        }
        Ok(RenderedCv::html("<html></html>".into(), "cv", template))
    }
}

/// A document with every export-required section filled.
pub fn complete_document() -> CvDocument {
    let mut document = CvDocument::default();
    document.personal_info = Some(PersonalInfo {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        phone: "+255712345678".into(),
        address: "Dar es Salaam".into(),
    });
    document.summary = Some("Experienced teacher with ten years of classroom work.".into());
    document.education.push(EducationEntry {
        institution: "University of Dar es Salaam".into(),
        degree: "BEd".into(),
        year: "2012".into(),
        details: String::new(),
    });
    document.experience.push(ExperienceEntry {
        company: "Azania Secondary".into(),
        role: "Teacher".into(),
        start_date: "01/2013".into(),
        end_date: "present".into(),
        description: "Taught mathematics to forms one to four.".into(),
    });
    document.skills = vec!["Teaching".into(), "Mathematics".into()];
    document
}
