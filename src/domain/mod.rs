//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `cv` - Section catalog, document model and field validators
//! - `conversation` - Section-flow state machine, input parsing and replies

pub mod conversation;
pub mod cv;
pub mod foundation;
