//! Field Extractor Port - natural-language to field-map extraction.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::IntentExtraction;
use crate::domain::cv::{CvDocument, FieldMap, Section};

use super::ai_provider::AIError;

/// Errors from the extraction collaborator.
///
/// All of them degrade to the same "didn't understand" reply; the variants
/// exist for logging.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("provider error: {0}")]
    Provider(#[from] AIError),

    #[error("malformed extraction response: {0}")]
    Malformed(String),

    #[error("nothing could be extracted")]
    Empty,
}

/// Turns free text into fields for a section.
///
/// # Contract
///
/// - Missing keys are normalized to `""`; no null values reach the caller
/// - Collaborator output is parsed strictly; anything unparseable is an
///   `ExtractionError`, never executed or guessed at
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extract the fields of `section` from `text`.
    async fn extract_fields(&self, text: &str, section: Section) -> Result<FieldMap, ExtractionError>;

    /// Extract fields and classify the message's intent, using the current
    /// document as context.
    ///
    /// The default treats every extraction as a fully confident answer for
    /// the active section.
    async fn extract_with_intent(
        &self,
        text: &str,
        section: Section,
        _document: &CvDocument,
    ) -> Result<IntentExtraction, ExtractionError> {
        let fields = self.extract_fields(text, section).await?;
        Ok(IntentExtraction::for_current_section(section, fields))
    }
}
