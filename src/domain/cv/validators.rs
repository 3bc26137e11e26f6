//! Field validators - the acceptance contract for every stored record.
//!
//! Each validator is pure and returns a deterministic [`FieldRejection`]
//! whose `Display` text is shown to the user verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::document::{
    CertificationEntry, CvDocument, EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry,
    ReferenceEntry, SectionEntry,
};
use super::section::Section;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]+$").expect("valid phone regex"));
static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])/\d{4}$").expect("valid date regex"));

const MIN_YEAR: u32 = 1900;
const MAX_YEAR: u32 = 2025;
const SUMMARY_MIN_CHARS: usize = 10;
const SUMMARY_MAX_CHARS: usize = 500;
const ONGOING_END_DATES: [&str; 3] = ["present", "now", "current"];

/// Why a candidate record was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldRejection {
    #[error("Name is required.")]
    NameRequired,
    #[error("At least one contact method (email or phone) is required.")]
    ContactMethodRequired,
    #[error("Invalid email format. Use something like name@example.com.")]
    InvalidEmail,
    #[error("Invalid phone format. Use 7-15 digits, e.g. +255712345678.")]
    InvalidPhone,

    #[error("Summary cannot be empty.")]
    SummaryEmpty,
    #[error("Summary must be at least 10 characters.")]
    SummaryTooShort,
    #[error("Summary must be at most 500 characters.")]
    SummaryTooLong,
    #[error("Summary needs at least 3 words.")]
    SummaryTooFewWords,
    #[error("Summary needs at least 2 meaningful words.")]
    SummaryTooFewMeaningfulWords,

    #[error("Institution, degree, and year are required.")]
    EducationFieldsRequired,
    #[error("Year must be a valid number between 1900 and 2025.")]
    InvalidYear,

    #[error("Company, role, start date, end date, and description are required.")]
    ExperienceFieldsRequired,
    #[error("Start date must be in MM/YYYY format.")]
    InvalidStartDate,
    #[error("End date must be in MM/YYYY format or 'present'.")]
    InvalidEndDate,

    #[error("Project name and description are required.")]
    ProjectFieldsRequired,

    #[error("At least one skill is required.")]
    SkillsRequired,
    #[error("Skills cannot contain empty entries.")]
    EmptySkill,

    #[error("Name, issuer, and year are required.")]
    CertificationFieldsRequired,

    #[error("Name and contact are required.")]
    ReferenceFieldsRequired,
    #[error("Contact must be an email or phone number, or 'N/A'.")]
    InvalidContact,
}

/// A record that passed its section's validator.
///
/// Only [`validate`] constructs this type, so holding one proves the
/// record is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry(SectionEntry);

impl ValidatedEntry {
    pub fn entry(&self) -> &SectionEntry {
        &self.0
    }

    pub fn into_inner(self) -> SectionEntry {
        self.0
    }
}

/// Runs the matching section validator.
pub fn validate(entry: SectionEntry) -> Result<ValidatedEntry, FieldRejection> {
    match &entry {
        SectionEntry::PersonalInfo(p) => validate_personal_info(p)?,
        SectionEntry::Summary(s) => validate_summary(s)?,
        SectionEntry::Education(e) => validate_education(e)?,
        SectionEntry::Experience(e) => validate_experience(e)?,
        SectionEntry::Project(p) => validate_project(p)?,
        SectionEntry::Skills(s) => validate_skills(s)?,
        SectionEntry::Certification(c) => validate_certification(c)?,
        SectionEntry::Reference(r) => validate_reference(r)?,
    }
    Ok(ValidatedEntry(entry))
}

/// A record in a whole document that fails its section's validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{section}: {reason}")]
pub struct DocumentRejection {
    pub section: Section,
    pub reason: FieldRejection,
}

/// Checks every record of a document supplied from outside the conversation.
///
/// Empty sections pass; a non-empty skills list is checked as one record.
pub fn validate_document(document: &CvDocument) -> Result<(), DocumentRejection> {
    fn check<T>(
        section: Section,
        records: &[T],
        validator: impl Fn(&T) -> Result<(), FieldRejection>,
    ) -> Result<(), DocumentRejection> {
        records
            .iter()
            .try_for_each(&validator)
            .map_err(|reason| DocumentRejection { section, reason })
    }

    check(
        Section::PersonalInfo,
        document.personal_info.as_slice(),
        validate_personal_info,
    )?;
    check(Section::Summary, document.summary.as_slice(), |s: &String| {
        validate_summary(s)
    })?;
    check(Section::Education, &document.education, validate_education)?;
    check(Section::Experience, &document.experience, validate_experience)?;
    check(Section::Projects, &document.projects, validate_project)?;
    if !document.skills.is_empty() {
        validate_skills(&document.skills).map_err(|reason| DocumentRejection {
            section: Section::Skills,
            reason,
        })?;
    }
    check(
        Section::Certifications,
        &document.certifications,
        validate_certification,
    )?;
    check(Section::References, &document.references, validate_reference)?;
    Ok(())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `local@domain.tld` shape.
pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Optional leading `+`, digits with spaces/hyphens/parens, 7 to 15 digits.
pub fn is_phone(value: &str) -> bool {
    let value = value.trim();
    let digits = value.chars().filter(char::is_ascii_digit).count();
    PHONE_RE.is_match(value) && (7..=15).contains(&digits)
}

/// `MM/YYYY`.
pub fn is_month_year(value: &str) -> bool {
    MONTH_YEAR_RE.is_match(value.trim())
}

/// Four ASCII digits between 1900 and 2025 inclusive.
pub fn is_valid_year(value: &str) -> bool {
    let value = value.trim();
    value.len() == 4
        && value.chars().all(|c| c.is_ascii_digit())
        && value
            .parse::<u32>()
            .map(|y| (MIN_YEAR..=MAX_YEAR).contains(&y))
            .unwrap_or(false)
}

pub fn validate_personal_info(info: &PersonalInfo) -> Result<(), FieldRejection> {
    if blank(&info.name) {
        return Err(FieldRejection::NameRequired);
    }
    if blank(&info.email) && blank(&info.phone) {
        return Err(FieldRejection::ContactMethodRequired);
    }
    if !blank(&info.email) && !is_email(&info.email) {
        return Err(FieldRejection::InvalidEmail);
    }
    if !blank(&info.phone) && !is_phone(&info.phone) {
        return Err(FieldRejection::InvalidPhone);
    }
    Ok(())
}

pub fn validate_summary(summary: &str) -> Result<(), FieldRejection> {
    let summary = summary.trim();
    if summary.is_empty() {
        return Err(FieldRejection::SummaryEmpty);
    }
    let chars = summary.chars().count();
    if chars < SUMMARY_MIN_CHARS {
        return Err(FieldRejection::SummaryTooShort);
    }
    if chars > SUMMARY_MAX_CHARS {
        return Err(FieldRejection::SummaryTooLong);
    }
    let words: Vec<&str> = summary.split_whitespace().collect();
    if words.len() < 3 {
        return Err(FieldRejection::SummaryTooFewWords);
    }
    if words.iter().filter(|w| w.chars().count() > 1).count() < 2 {
        return Err(FieldRejection::SummaryTooFewMeaningfulWords);
    }
    Ok(())
}

pub fn validate_education(entry: &EducationEntry) -> Result<(), FieldRejection> {
    if blank(&entry.institution) || blank(&entry.degree) || blank(&entry.year) {
        return Err(FieldRejection::EducationFieldsRequired);
    }
    if !is_valid_year(&entry.year) {
        return Err(FieldRejection::InvalidYear);
    }
    Ok(())
}

pub fn validate_experience(entry: &ExperienceEntry) -> Result<(), FieldRejection> {
    if [
        &entry.company,
        &entry.role,
        &entry.start_date,
        &entry.end_date,
        &entry.description,
    ]
    .iter()
    .any(|v| blank(v))
    {
        return Err(FieldRejection::ExperienceFieldsRequired);
    }
    if !is_month_year(&entry.start_date) {
        return Err(FieldRejection::InvalidStartDate);
    }
    let end = entry.end_date.trim().to_lowercase();
    if !is_month_year(&end) && !ONGOING_END_DATES.contains(&end.as_str()) {
        return Err(FieldRejection::InvalidEndDate);
    }
    Ok(())
}

pub fn validate_project(entry: &ProjectEntry) -> Result<(), FieldRejection> {
    if blank(&entry.name) || blank(&entry.description) {
        return Err(FieldRejection::ProjectFieldsRequired);
    }
    Ok(())
}

pub fn validate_skills(skills: &[String]) -> Result<(), FieldRejection> {
    if skills.is_empty() {
        return Err(FieldRejection::SkillsRequired);
    }
    if skills.iter().any(|s| blank(s)) {
        return Err(FieldRejection::EmptySkill);
    }
    Ok(())
}

pub fn validate_certification(entry: &CertificationEntry) -> Result<(), FieldRejection> {
    if blank(&entry.name) || blank(&entry.issuer) || blank(&entry.year) {
        return Err(FieldRejection::CertificationFieldsRequired);
    }
    if !is_valid_year(&entry.year) {
        return Err(FieldRejection::InvalidYear);
    }
    Ok(())
}

pub fn validate_reference(entry: &ReferenceEntry) -> Result<(), FieldRejection> {
    if blank(&entry.name) || blank(&entry.contact) {
        return Err(FieldRejection::ReferenceFieldsRequired);
    }
    let contact = entry.contact.trim();
    if !(is_email(contact) || is_phone(contact) || contact.eq_ignore_ascii_case("n/a")) {
        return Err(FieldRejection::InvalidContact);
    }
    Ok(())
}
