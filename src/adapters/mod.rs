//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language-model providers and the extraction/enhancement assistant
//! - `document` - CV rendering
//! - `http` - REST API (axum)
//! - `storage` - Session stores (file, in-memory)

pub mod ai;
pub mod document;
pub mod http;
pub mod storage;
