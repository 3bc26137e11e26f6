//! Natural-language extraction results and plausibility checks.
//!
//! The extraction collaborator classifies each message with an [`Intent`]
//! and a confidence. Plausibility checks run on its field map before the
//! section validator, catching extractions that are well-formed but
//! obviously not what the section asks for.

use serde::{Deserialize, Serialize};

use crate::domain::cv::{FieldMap, Section};

/// Words that mark a summary as being about work.
const WORK_CUES: [&str; 8] = ["work", "job", "experience", "skilled", "years", "run", "sell", "teach"];

/// What the user meant by a natural-language message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Fields belong to the active section.
    CurrentSection,
    /// Fields update an earlier, already-visited section.
    UpdatePrevious,
    /// Nothing usable.
    Unclear,
}

/// Structured result of an intent-aware extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentExtraction {
    pub intent: Intent,
    pub target_section: Option<Section>,
    pub extracted_data: FieldMap,
    /// In `0.0..=1.0`.
    pub confidence: f64,
    pub response_message: String,
    /// Advisory only; the section catalog decides transitions.
    pub should_advance: bool,
    pub validation_notes: Vec<String>,
}

impl IntentExtraction {
    /// Wraps a plain field extraction as a fully confident current-section result.
    pub fn for_current_section(section: Section, fields: FieldMap) -> Self {
        Self {
            intent: Intent::CurrentSection,
            target_section: Some(section),
            extracted_data: fields,
            confidence: 1.0,
            response_message: String::new(),
            should_advance: !section.is_repeatable(),
            validation_notes: Vec::new(),
        }
    }

    /// An unclear result with zero confidence.
    pub fn unclear() -> Self {
        Self {
            intent: Intent::Unclear,
            target_section: None,
            extracted_data: FieldMap::new(),
            confidence: 0.0,
            response_message: String::new(),
            should_advance: false,
            validation_notes: Vec::new(),
        }
    }
}

/// Returns a clarification message when `fields` do not plausibly belong
/// to `section`.
pub fn check_plausibility(section: Section, fields: &FieldMap) -> Result<(), &'static str> {
    let plausible = match section {
        Section::PersonalInfo => true,
        Section::Summary => is_plausible_summary(fields.get_trimmed("summary")),
        Section::Education => {
            fields.has("institution") || (fields.has("degree") && fields.has("year"))
        }
        Section::Experience => {
            fields.has("company")
                || (fields.has("role") && (fields.has("start_date") || fields.has("description")))
        }
        Section::Projects => fields.has("name") && fields.has("description"),
        Section::Skills => {
            fields.has("skills") && fields.get("skills").split(',').all(|s| !s.trim().is_empty())
        }
        Section::Certifications => {
            fields.has("name") && (fields.has("issuer") || fields.has("year"))
        }
        Section::References => fields.has("name") && fields.has("contact"),
    };
    if plausible {
        Ok(())
    } else {
        Err(implausible_message(section))
    }
}

fn is_plausible_summary(text: &str) -> bool {
    if text.split_whitespace().count() < 3 {
        return false;
    }
    let lower = text.to_lowercase();
    WORK_CUES.iter().any(|cue| lower.contains(cue))
}

fn implausible_message(section: Section) -> &'static str {
    match section {
        Section::PersonalInfo => "That doesn't look like personal details. Please share your name and an email or phone number.",
        Section::Summary => "That doesn't sound like a professional summary. Please share a bit about your work or skills (e.g., 'I've been a teacher for 3 years' or 'I sell clothes').",
        Section::Education => "That doesn't seem like a valid education or training entry. Please include a school or course and year (e.g., 'Vocational Training, Carpentry, 2019').",
        Section::Experience => "That doesn't seem like a valid work or activity. Please include where you worked, what you did, and when (e.g., 'Market Stall, Vendor, 01/2022, now, Sold fruit').",
        Section::Projects => "That doesn't seem like a valid project. Please include a name and what it was (e.g., 'My Shop, Selling goods').",
        Section::Skills => "That doesn't seem like a valid skill list. Please list at least one skill (e.g., 'cooking, sewing').",
        Section::Certifications => "That doesn't seem like a valid certificate. Please include a name and when you got it (e.g., 'Driving License, 2021').",
        Section::References => "That doesn't seem like a valid reference. Please include a name and how to reach them (e.g., 'John, john@example.com').",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod summary {
        use super::*;

        #[test]
        fn needs_a_work_cue() {
            let fields = FieldMap::new().with("summary", "I like sunny days a lot");
            assert!(check_plausibility(Section::Summary, &fields).is_err());

            let fields = FieldMap::new().with("summary", "I have taught maths for five years");
            assert!(check_plausibility(Section::Summary, &fields).is_ok());
        }

        #[test]
        fn needs_three_words() {
            let fields = FieldMap::new().with("summary", "work hard");
            let msg = check_plausibility(Section::Summary, &fields).unwrap_err();
            assert!(msg.starts_with("That doesn't sound like a professional summary."));
        }
    }

    mod entries {
        use super::*;

        #[test]
        fn education_accepts_institution_alone() {
            let fields = FieldMap::new().with("institution", "VETA");
            assert!(check_plausibility(Section::Education, &fields).is_ok());
        }

        #[test]
        fn education_accepts_degree_with_year() {
            let fields = FieldMap::new().with("degree", "Carpentry").with("year", "2019");
            assert!(check_plausibility(Section::Education, &fields).is_ok());
        }

        #[test]
        fn education_rejects_degree_alone() {
            let fields = FieldMap::new().with("degree", "Carpentry");
            assert!(check_plausibility(Section::Education, &fields).is_err());
        }

        #[test]
        fn experience_role_needs_date_or_description() {
            let role_only = FieldMap::new().with("role", "Vendor");
            assert!(check_plausibility(Section::Experience, &role_only).is_err());
            let with_desc = role_only.clone().with("description", "Sold fruit");
            assert!(check_plausibility(Section::Experience, &with_desc).is_ok());
        }

        #[test]
        fn certification_needs_issuer_or_year() {
            let fields = FieldMap::new().with("name", "Driving License").with("year", "2021");
            assert!(check_plausibility(Section::Certifications, &fields).is_ok());
            let fields = FieldMap::new().with("name", "Driving License");
            assert!(check_plausibility(Section::Certifications, &fields).is_err());
        }

        #[test]
        fn skills_reject_empty_items() {
            let fields = FieldMap::new().with("skills", "cooking, ");
            assert!(check_plausibility(Section::Skills, &fields).is_err());
        }

        #[test]
        fn personal_info_is_left_to_the_validator() {
            assert!(check_plausibility(Section::PersonalInfo, &FieldMap::new()).is_ok());
        }
    }

    #[test]
    fn plain_extraction_is_fully_confident() {
        let x = IntentExtraction::for_current_section(Section::Education, FieldMap::new());
        assert_eq!(x.intent, Intent::CurrentSection);
        assert_eq!(x.confidence, 1.0);
        assert!(!x.should_advance);
    }

    #[test]
    fn intent_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&Intent::UpdatePrevious).unwrap(),
            "\"update_previous\""
        );
    }
}
