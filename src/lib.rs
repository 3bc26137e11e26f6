//! Niajiri CV Assistant - Guided conversational CV builder
//!
//! This crate walks a job seeker through the sections of a CV one at a
//! time, accepting either comma-separated structured input or free-form
//! natural language, and produces a validated document that can be
//! reviewed, improved and exported.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
