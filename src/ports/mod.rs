//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `AIProvider` - Chat-completion language model
//! - `FieldExtractor` - Natural-language field extraction with intent
//! - `TextEnhancer` - Best-effort text rewriting
//! - `CvRenderer` - Document rendering with named templates
//!
//! ## Persistence Ports
//!
//! - `SessionStore` - Load/save conversation sessions by id

mod ai_provider;
mod cv_renderer;
mod field_extractor;
mod session_store;
mod text_enhancer;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, RequestPurpose, TokenUsage,
};
pub use cv_renderer::{CvRenderer, CvTemplate, RenderError, RenderedCv};
pub use field_extractor::{ExtractionError, FieldExtractor};
pub use session_store::{SessionStore, SessionStoreError};
pub use text_enhancer::{EnhanceError, TextEnhancer};
