//! HTTP DTOs for CV assistant endpoints.
//!
//! These types decouple the HTTP API from handler results.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::{ImproveDocumentResult, ProcessInputResult, StartSessionResult};
use crate::domain::cv::{CvDocument, Section};
use crate::domain::foundation::ErrorCode;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One user turn.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Query parameters for export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub template: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Where the session currently stands in the section flow.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionView {
    /// `None` once every section is done.
    pub current_section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub complete: bool,
}

impl From<Option<Section>> for SectionView {
    fn from(section: Option<Section>) -> Self {
        Self {
            current_section: section,
            label: section.map(|s| s.label().to_string()),
            complete: section.is_none(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub response: String,
    pub is_new: bool,
    #[serde(flatten)]
    pub section: SectionView,
}

impl StartSessionResponse {
    pub fn new(session_id: &str, result: StartSessionResult) -> Self {
        Self {
            session_id: session_id.to_string(),
            response: result.response,
            is_new: result.is_new,
            section: result.current_section.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub response: String,
    #[serde(flatten)]
    pub section: SectionView,
}

impl From<ProcessInputResult> for MessageResponse {
    fn from(result: ProcessInputResult) -> Self {
        Self {
            response: result.response,
            section: result.current_section.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImproveResponse {
    pub document: CvDocument,
    /// False when the rewrite failed and the document was left as it was.
    pub applied: bool,
}

impl From<ImproveDocumentResult> for ImproveResponse {
    fn from(result: ImproveDocumentResult) -> Self {
        Self {
            document: result.document,
            applied: result.applied,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_session_id(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::InvalidSessionId, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_record(section: Section, message: impl Into<String>) -> Self {
        Self {
            details: Some(json!({ "section": section.as_str() })),
            ..Self::with_code(ErrorCode::ValidationFailed, message)
        }
    }

    pub fn session_not_found(id: &str) -> Self {
        Self::with_code(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
    }

    pub fn export_blocked(missing: &[Section], message: impl Into<String>) -> Self {
        let missing: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
        Self {
            details: Some(json!({ "missing": missing })),
            ..Self::with_code(ErrorCode::ExportBlocked, message)
        }
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::RenderFailed, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::StorageError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::InternalError, message)
    }
}
