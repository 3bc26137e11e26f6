//! Section-flow conversation engine.
//!
//! Decides, for each incoming message, which section it belongs to, whether
//! it satisfies that section, how the document changes and where the
//! conversation moves next.
//!
//! The engine is pure. Turns that need a collaborator are split in two:
//! [`ConversationEngine::begin_turn`] returns a [`TurnStep`] asking for
//! extraction, summary enhancement or improvement, the caller performs the
//! call, and hands the result back to
//! [`ConversationEngine::complete_extraction`],
//! [`ConversationEngine::complete_summary`] or
//! [`ConversationEngine::complete_improvement`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::cv::validators::validate_summary;
use crate::domain::cv::{validate, CvDocument, FieldMap, FieldRejection, Section, SectionEntry};
use crate::domain::foundation::StateMachine;

use super::extraction::{check_plausibility, Intent, IntentExtraction};
use super::parser::parse_structured;
use super::position::FlowPosition;
use super::responses;
use super::session::ConversationSession;

static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(hello|hi|hey|good morning|good afternoon|karibu)\b").expect("valid greeting regex")
});

/// Extractions below this confidence are never applied.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Tunables for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum extraction confidence to apply extracted fields.
    pub min_confidence: f64,
    /// Words that request an improvement once all sections are visited.
    pub improve_keywords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            improve_keywords: ["improve", "enhance", "polish", "better"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// What a finished turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    Greeted,
    EntryAdded { section: Section, advanced: bool },
    SectionClosed { section: Section, skipped: bool },
    Rejected { section: Section },
    Clarification { section: Section },
    NotUnderstood { section: Section },
    PreviousUpdated { section: Section },
    Menu,
    Reviewed,
    Improved { applied: bool },
}

/// The reply to a finished turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub response: String,
    pub event: TurnEvent,
    pub position: FlowPosition,
}

/// Result of starting a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnStep {
    /// The turn is finished.
    Done(TurnOutcome),
    /// Structured parsing failed; run natural-language extraction.
    NeedsExtraction { section: Section, text: String },
    /// An acceptable summary; rewrite it before it is stored.
    NeedsSummaryEnhancement { summary: String },
    /// The user asked for an improved document.
    NeedsImprovement,
}

/// Drives one conversation through the section catalog.
#[derive(Debug, Clone, Default)]
pub struct ConversationEngine {
    config: EngineConfig,
}

impl ConversationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opening message for a new or resumed session. Never changes the
    /// position or the document.
    pub fn start(&self, session: &mut ConversationSession, is_new: bool) -> String {
        let position = session.position();
        let response = if is_new {
            format!("{}\n\n{}", responses::WELCOME, Self::prompt_for(position))
        } else if position.is_terminal() {
            format!("{}\n\n{}", responses::welcome_back(None), responses::ALL_COMPLETE)
        } else {
            format!(
                "{}\n\n{}",
                responses::welcome_back(position.current_section()),
                Self::prompt_for(position)
            )
        };
        session.record_assistant(response.as_str());
        session.touch();
        response
    }

    /// Handles everything that needs no collaborator.
    pub fn begin_turn(&self, session: &mut ConversationSession, raw: &str) -> TurnStep {
        let text = raw.trim();
        session.record_user(text);
        let lower = text.to_lowercase();

        if GREETING_RE.is_match(&lower) {
            let prompt = Self::prompt_for(session.position());
            let response = format!("{} {}", responses::GREETING, prompt);
            return TurnStep::Done(self.reply(session, response, TurnEvent::Greeted));
        }

        let section = match session.position() {
            FlowPosition::Complete => return self.handle_complete(session, &lower),
            FlowPosition::Active(section) => section,
        };

        if section.is_repeatable() {
            match lower.as_str() {
                "done" => {
                    let msg = responses::section_done(section);
                    let event = TurnEvent::SectionClosed { section, skipped: false };
                    return TurnStep::Done(self.advance(session, msg, event));
                }
                "skip" => {
                    let kept = session.document.entry_count(section);
                    let msg = responses::section_skipped(section, kept);
                    let event = TurnEvent::SectionClosed { section, skipped: true };
                    return TurnStep::Done(self.advance(session, msg, event));
                }
                _ => {}
            }
        }

        if text.is_empty() {
            return TurnStep::Done(self.not_understood(session, section));
        }

        match parse_structured(section, text) {
            Some(fields) if section == Section::Summary => self.begin_summary(session, &fields),
            Some(fields) => {
                debug!(section = %section, "structured input parsed");
                TurnStep::Done(self.accept(session, section, fields))
            }
            None => {
                debug!(section = %section, "structured parse failed, requesting extraction");
                TurnStep::NeedsExtraction {
                    section,
                    text: text.to_string(),
                }
            }
        }
    }

    /// Applies a natural-language extraction. `None` means the collaborator
    /// failed.
    pub fn complete_extraction(
        &self,
        session: &mut ConversationSession,
        extraction: Option<IntentExtraction>,
    ) -> TurnOutcome {
        let section = match session.position() {
            FlowPosition::Active(section) => section,
            FlowPosition::Complete => return self.reply(session, responses::MENU.into(), TurnEvent::Menu),
        };
        let Some(extraction) = extraction else {
            return self.not_understood(session, section);
        };

        // NaN confidence fails this comparison too
        let confident = extraction.confidence >= self.config.min_confidence;
        if extraction.intent == Intent::Unclear || !confident {
            debug!(
                section = %section,
                confidence = extraction.confidence,
                intent = ?extraction.intent,
                "extraction not applied"
            );
            return self.clarify(session, section, responses::CLARIFY);
        }
        if extraction.extracted_data.is_blank() {
            return self.not_understood(session, section);
        }

        if extraction.intent == Intent::UpdatePrevious {
            match extraction.target_section {
                Some(target) if target == section => {}
                Some(target) if target.is_before(&section) => {
                    return self.update_previous(session, section, target, extraction.extracted_data);
                }
                _ => return self.clarify(session, section, responses::CLARIFY),
            }
        }

        if let Err(message) = check_plausibility(section, &extraction.extracted_data) {
            return self.clarify(session, section, message);
        }
        self.accept(session, section, extraction.extracted_data)
    }

    /// Stores a summary after enhancement. The rewrite is kept only when it
    /// passes the summary validator; otherwise `original` is stored.
    pub fn complete_summary(
        &self,
        session: &mut ConversationSession,
        original: &str,
        enhanced: &str,
    ) -> TurnOutcome {
        if session.position() != FlowPosition::Active(Section::Summary) {
            return self.reply(session, responses::MENU.into(), TurnEvent::Menu);
        }

        let candidate = match validate(SectionEntry::Summary(enhanced.trim().to_string())) {
            Ok(entry) => Ok(entry),
            Err(rejection) => {
                debug!(reason = %rejection, "enhanced summary rejected, keeping original");
                validate(SectionEntry::Summary(original.trim().to_string()))
            }
        };
        match candidate {
            Err(rejection) => self.reject(session, Section::Summary, rejection),
            Ok(entry) => {
                session.document.apply(entry);
                let stored = session.document.summary.clone().unwrap_or_default();
                let event = TurnEvent::EntryAdded { section: Section::Summary, advanced: true };
                self.advance(session, responses::summary_added(&stored), event)
            }
        }
    }

    /// Applies the result of an improvement. `None` means it failed and
    /// the document stays as it was.
    pub fn complete_improvement(
        &self,
        session: &mut ConversationSession,
        improved: Option<CvDocument>,
    ) -> TurnOutcome {
        match improved {
            Some(document) => {
                session.document = document;
                let response = responses::improved(&session.document.to_string());
                self.reply(session, response, TurnEvent::Improved { applied: true })
            }
            None => {
                let response = format!("{}\n\n{}", responses::IMPROVE_FAILED, responses::MENU);
                self.reply(session, response, TurnEvent::Improved { applied: false })
            }
        }
    }

    fn handle_complete(&self, session: &mut ConversationSession, lower: &str) -> TurnStep {
        if lower == "review" {
            let response = responses::review(&session.document.to_string());
            return TurnStep::Done(self.reply(session, response, TurnEvent::Reviewed));
        }
        if lower == "improve" || self.wants_improvement(lower) {
            return TurnStep::NeedsImprovement;
        }
        TurnStep::Done(self.reply(session, responses::MENU.into(), TurnEvent::Menu))
    }

    fn wants_improvement(&self, lower: &str) -> bool {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| self.config.improve_keywords.iter().any(|k| k == word))
    }

    /// A structured summary must read like one and pass its validator
    /// before it is handed out for enhancement.
    fn begin_summary(&self, session: &mut ConversationSession, fields: &FieldMap) -> TurnStep {
        let section = Section::Summary;
        if let Err(message) = check_plausibility(section, fields) {
            return TurnStep::Done(self.clarify(session, section, message));
        }
        let summary = fields.get_trimmed("summary");
        if let Err(rejection) = validate_summary(summary) {
            return TurnStep::Done(self.reject(session, section, rejection));
        }
        TurnStep::NeedsSummaryEnhancement {
            summary: summary.to_string(),
        }
    }

    /// Validates `fields` for the active section and stores them.
    fn accept(
        &self,
        session: &mut ConversationSession,
        section: Section,
        fields: FieldMap,
    ) -> TurnOutcome {
        match validate(SectionEntry::from_fields(section, &fields)) {
            Err(rejection) => self.reject(session, section, rejection),
            Ok(entry) => {
                session.document.apply(entry);
                let msg = responses::entry_added(section);
                if section.is_repeatable() {
                    let event = TurnEvent::EntryAdded { section, advanced: false };
                    self.reply(session, Self::with_prompt(msg, section), event)
                } else {
                    let event = TurnEvent::EntryAdded { section, advanced: true };
                    self.advance(session, msg.to_string(), event)
                }
            }
        }
    }

    /// Stores fields for an earlier section without moving the conversation.
    fn update_previous(
        &self,
        session: &mut ConversationSession,
        current: Section,
        target: Section,
        fields: FieldMap,
    ) -> TurnOutcome {
        let fields = if target == Section::PersonalInfo {
            session.document.personal_info_fields().overlay(&fields)
        } else {
            fields
        };
        if let Err(message) = check_plausibility(target, &fields) {
            return self.clarify(session, current, message);
        }
        match validate(SectionEntry::from_fields(target, &fields)) {
            Err(rejection) => {
                let response = Self::with_prompt(&rejection.to_string(), current);
                self.reply(session, response, TurnEvent::Rejected { section: current })
            }
            Ok(entry) => {
                session.document.apply(entry);
                debug!(target = %target, current = %current, "earlier section updated");
                let response = Self::with_prompt(&responses::previous_updated(target), current);
                self.reply(session, response, TurnEvent::PreviousUpdated { section: target })
            }
        }
    }

    fn reject(&self, session: &mut ConversationSession, section: Section, rejection: FieldRejection) -> TurnOutcome {
        debug!(section = %section, reason = %rejection, "input rejected");
        let response = Self::with_prompt(&rejection.to_string(), section);
        self.reply(session, response, TurnEvent::Rejected { section })
    }

    fn advance(&self, session: &mut ConversationSession, msg: String, event: TurnEvent) -> TurnOutcome {
        let current = session.position();
        let next = match current.transition_to(current.successor()) {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "refusing to advance");
                return self.reply(session, responses::MENU.into(), TurnEvent::Menu);
            }
        };
        session.set_position(next);
        let response = match next {
            FlowPosition::Active(section) => Self::with_prompt(&msg, section),
            FlowPosition::Complete => format!("{}\n\n{}", msg, responses::ALL_COMPLETE),
        };
        self.reply(session, response, event)
    }

    fn clarify(&self, session: &mut ConversationSession, section: Section, message: &str) -> TurnOutcome {
        let response = Self::with_prompt(message, section);
        self.reply(session, response, TurnEvent::Clarification { section })
    }

    fn not_understood(&self, session: &mut ConversationSession, section: Section) -> TurnOutcome {
        let response = Self::with_prompt(responses::NOT_UNDERSTOOD, section);
        self.reply(session, response, TurnEvent::NotUnderstood { section })
    }

    fn reply(&self, session: &mut ConversationSession, response: String, event: TurnEvent) -> TurnOutcome {
        session.record_assistant(response.as_str());
        session.touch();
        TurnOutcome {
            response,
            event,
            position: session.position(),
        }
    }

    fn with_prompt(message: &str, section: Section) -> String {
        format!("{}\n\n{}", message, section.prompt())
    }

    fn prompt_for(position: FlowPosition) -> &'static str {
        match position {
            FlowPosition::Active(section) => section.prompt(),
            FlowPosition::Complete => responses::MENU,
        }
    }
}
