//! Text Enhancer Port - best-effort rewriting of free text.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use super::ai_provider::AIError;

#[derive(Debug, Clone, Error)]
pub enum EnhanceError {
    #[error("provider error: {0}")]
    Provider(#[from] AIError),

    #[error("malformed enhancement response: {0}")]
    Malformed(String),

    #[error("expected {expected} rewritten texts, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Rewrites text to read better on a CV.
#[async_trait]
pub trait TextEnhancer: Send + Sync {
    /// Rewrite one text, reporting failures.
    async fn try_enhance(&self, text: &str) -> Result<String, EnhanceError>;

    /// Rewrite several texts, returning one result per input in order.
    ///
    /// The default issues one call per text and fails on the first error.
    async fn try_enhance_batch(&self, texts: &[String]) -> Result<Vec<String>, EnhanceError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.try_enhance(text).await?);
        }
        Ok(out)
    }

    /// Rewrite one text, falling back to the original on any failure.
    async fn enhance_text(&self, text: &str) -> String {
        match self.try_enhance(text).await {
            Ok(enhanced) if !enhanced.trim().is_empty() => enhanced,
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!(error = %e, "text enhancement failed, keeping original");
                text.to_string()
            }
        }
    }
}
