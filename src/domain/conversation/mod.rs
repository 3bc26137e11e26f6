//! Conversation module - the section-flow state machine.
//!
//! A conversation walks the CV section catalog one section at a time.
//! Each user message is parsed (structured first, natural language second),
//! validated, applied to the document, and answered with the next prompt.

mod engine;
mod extraction;
mod message;
mod parser;
mod position;
pub mod responses;
mod session;

pub use engine::{
    ConversationEngine, EngineConfig, TurnEvent, TurnOutcome, TurnStep, DEFAULT_MIN_CONFIDENCE,
};
pub use extraction::{check_plausibility, Intent, IntentExtraction};
pub use message::{HistoryEntry, Role};
pub use parser::{parse_structured, tokenize};
pub use position::FlowPosition;
pub use session::ConversationSession;
