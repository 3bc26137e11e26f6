//! HTTP adapters - REST API implementations.
//!
//! The CV assistant is exposed under `/api/sessions`.

pub mod cv;

// Re-export key types for convenience
pub use cv::{cv_routes, CvHandlers};
