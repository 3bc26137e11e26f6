//! CV Renderer Port - turns a document into a downloadable artifact.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::cv::CvDocument;

/// Port for rendering a CV with a named visual style.
///
/// # Contract
///
/// Implementations must:
/// - Render every non-empty section of the document
/// - Be all-or-nothing: either a complete artifact or an error
#[async_trait]
pub trait CvRenderer: Send + Sync {
    async fn render(&self, document: &CvDocument, template: CvTemplate) -> Result<RenderedCv, RenderError>;
}

/// Named visual styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvTemplate {
    #[default]
    Modern,
    Classic,
    Minimal,
}

impl CvTemplate {
    pub fn all() -> [CvTemplate; 3] {
        [CvTemplate::Modern, CvTemplate::Classic, CvTemplate::Minimal]
    }

    /// Resolves a template name, falling back to the default for unknown names.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "classic" => CvTemplate::Classic,
            "minimal" => CvTemplate::Minimal,
            _ => CvTemplate::Modern,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CvTemplate::Modern => "modern",
            CvTemplate::Classic => "classic",
            CvTemplate::Minimal => "minimal",
        }
    }
}

impl std::fmt::Display for CvTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rendered artifact with content and metadata.
#[derive(Debug, Clone)]
pub struct RenderedCv {
    pub content: Vec<u8>,
    /// The MIME content type.
    pub content_type: String,
    /// Suggested filename for download.
    pub filename: String,
    pub template: CvTemplate,
}

impl RenderedCv {
    pub fn html(html: String, base_filename: &str, template: CvTemplate) -> Self {
        Self {
            content: html.into_bytes(),
            content_type: "text/html; charset=utf-8".to_string(),
            filename: format!("{}.html", base_filename),
            template,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("Rendering failed: {0}")]
    Failed(String),

    #[error("Renderer unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_template_names_resolve() {
        assert_eq!(CvTemplate::from_name("Classic"), CvTemplate::Classic);
        assert_eq!(CvTemplate::from_name(" minimal "), CvTemplate::Minimal);
        assert_eq!(CvTemplate::from_name("modern"), CvTemplate::Modern);
    }

    #[test]
    fn unknown_template_falls_back_to_modern() {
        assert_eq!(CvTemplate::from_name("fancy"), CvTemplate::Modern);
        assert_eq!(CvTemplate::from_name(""), CvTemplate::default());
    }

    #[test]
    fn names_round_trip() {
        for template in CvTemplate::all() {
            assert_eq!(CvTemplate::from_name(template.as_str()), template);
        }
    }

    #[test]
    fn html_artifact_metadata() {
        let rendered = RenderedCv::html("<html></html>".into(), "jane_doe_cv", CvTemplate::Classic);
        assert_eq!(rendered.filename, "jane_doe_cv.html");
        assert!(rendered.content_type.starts_with("text/html"));
    }
}
