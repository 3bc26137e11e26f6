//! The accumulated CV document and its per-section records.
//!
//! Records only enter a [`CvDocument`] through [`CvDocument::apply`], which
//! takes a [`ValidatedEntry`]. A record that has not passed its section's
//! validator cannot be stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fields::FieldMap;
use super::section::Section;
use super::validators::ValidatedEntry;

/// Singleton contact record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub year: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub relationship: String,
}

/// One candidate record for a section, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionEntry {
    PersonalInfo(PersonalInfo),
    Summary(String),
    Education(EducationEntry),
    Experience(ExperienceEntry),
    Project(ProjectEntry),
    Skills(Vec<String>),
    Certification(CertificationEntry),
    Reference(ReferenceEntry),
}

impl SectionEntry {
    /// Builds a typed record for `section` from a field map, trimming values.
    ///
    /// Skills are read from the comma-separated `skills` field; a blank
    /// field yields an empty list.
    pub fn from_fields(section: Section, fields: &FieldMap) -> Self {
        let f = |key: &str| fields.get_trimmed(key).to_string();
        match section {
            Section::PersonalInfo => Self::PersonalInfo(PersonalInfo {
                name: f("name"),
                email: f("email"),
                phone: f("phone"),
                address: f("address"),
            }),
            Section::Summary => Self::Summary(f("summary")),
            Section::Education => Self::Education(EducationEntry {
                institution: f("institution"),
                degree: f("degree"),
                year: f("year"),
                details: f("details"),
            }),
            Section::Experience => Self::Experience(ExperienceEntry {
                company: f("company"),
                role: f("role"),
                start_date: f("start_date"),
                end_date: f("end_date"),
                description: f("description"),
            }),
            Section::Projects => Self::Project(ProjectEntry {
                name: f("name"),
                description: f("description"),
                technologies: f("technologies"),
            }),
            Section::Skills => {
                let raw = fields.get_trimmed("skills");
                let skills = if raw.is_empty() {
                    Vec::new()
                } else {
                    raw.split(',').map(|s| s.trim().to_string()).collect()
                };
                Self::Skills(skills)
            }
            Section::Certifications => Self::Certification(CertificationEntry {
                name: f("name"),
                issuer: f("issuer"),
                year: f("year"),
            }),
            Section::References => Self::Reference(ReferenceEntry {
                name: f("name"),
                contact: f("contact"),
                relationship: f("relationship"),
            }),
        }
    }

    /// The section this record belongs to.
    pub fn section(&self) -> Section {
        match self {
            Self::PersonalInfo(_) => Section::PersonalInfo,
            Self::Summary(_) => Section::Summary,
            Self::Education(_) => Section::Education,
            Self::Experience(_) => Section::Experience,
            Self::Project(_) => Section::Projects,
            Self::Skills(_) => Section::Skills,
            Self::Certification(_) => Section::Certifications,
            Self::Reference(_) => Section::References,
        }
    }
}

/// The accumulated, validated CV for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvDocument {
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<CertificationEntry>,
    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
}

impl CvDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a validated record.
    ///
    /// Personal info and summary are replaced wholesale; every other
    /// section appends.
    pub fn apply(&mut self, entry: ValidatedEntry) {
        match entry.into_inner() {
            SectionEntry::PersonalInfo(info) => self.personal_info = Some(info),
            SectionEntry::Summary(text) => self.summary = Some(text),
            SectionEntry::Education(e) => self.education.push(e),
            SectionEntry::Experience(e) => self.experience.push(e),
            SectionEntry::Project(p) => self.projects.push(p),
            SectionEntry::Skills(skills) => self.skills.extend(skills),
            SectionEntry::Certification(c) => self.certifications.push(c),
            SectionEntry::Reference(r) => self.references.push(r),
        }
    }

    /// Current personal info as a field map, for partial updates.
    pub fn personal_info_fields(&self) -> FieldMap {
        match &self.personal_info {
            Some(info) => FieldMap::new()
                .with("name", info.name.as_str())
                .with("email", info.email.as_str())
                .with("phone", info.phone.as_str())
                .with("address", info.address.as_str()),
            None => FieldMap::new(),
        }
    }

    /// Number of stored records for a section.
    pub fn entry_count(&self, section: Section) -> usize {
        match section {
            Section::PersonalInfo => usize::from(self.personal_info.is_some()),
            Section::Summary => usize::from(self.summary.is_some()),
            Section::Education => self.education.len(),
            Section::Experience => self.experience.len(),
            Section::Projects => self.projects.len(),
            Section::Skills => self.skills.len(),
            Section::Certifications => self.certifications.len(),
            Section::References => self.references.len(),
        }
    }

    /// True when the section holds at least one non-whitespace value.
    pub fn has_meaningful_data(&self, section: Section) -> bool {
        fn any<S: AsRef<str>>(values: &[S]) -> bool {
            values.iter().any(|v| !v.as_ref().trim().is_empty())
        }
        match section {
            Section::PersonalInfo => self
                .personal_info
                .as_ref()
                .is_some_and(|p| any(&[&p.name, &p.email, &p.phone, &p.address])),
            Section::Summary => self.summary.as_deref().is_some_and(|s| any(&[s])),
            Section::Education => self
                .education
                .iter()
                .any(|e| any(&[&e.institution, &e.degree, &e.year, &e.details])),
            Section::Experience => self.experience.iter().any(|e| {
                any(&[&e.company, &e.role, &e.start_date, &e.end_date, &e.description])
            }),
            Section::Projects => self
                .projects
                .iter()
                .any(|p| any(&[&p.name, &p.description, &p.technologies])),
            Section::Skills => self.skills.iter().any(|s| any(&[s])),
            Section::Certifications => self
                .certifications
                .iter()
                .any(|c| any(&[&c.name, &c.issuer, &c.year])),
            Section::References => self
                .references
                .iter()
                .any(|r| any(&[&r.name, &r.contact, &r.relationship])),
        }
    }

    /// Export-required sections that fail the meaningful-data check.
    pub fn missing_for_export(&self) -> Vec<Section> {
        Section::export_required()
            .iter()
            .copied()
            .filter(|s| !self.has_meaningful_data(*s))
            .collect()
    }
}

fn join_present<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-text review rendering, one line or block per non-empty section.
impl fmt::Display for CvDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.personal_info {
            writeln!(
                f,
                "Personal Info: {}",
                join_present(&[&p.name, &p.email, &p.phone, &p.address])
            )?;
        }
        if let Some(summary) = &self.summary {
            writeln!(f, "Summary: {}", summary)?;
        }
        if !self.education.is_empty() {
            writeln!(f, "Education:")?;
            for e in &self.education {
                writeln!(f, "- {}", join_present(&[&e.institution, &e.degree, &e.year, &e.details]))?;
            }
        }
        if !self.experience.is_empty() {
            writeln!(f, "Experience:")?;
            for e in &self.experience {
                writeln!(
                    f,
                    "- {}, {}, {} - {}, {}",
                    e.company, e.role, e.start_date, e.end_date, e.description
                )?;
            }
        }
        if !self.projects.is_empty() {
            writeln!(f, "Projects:")?;
            for p in &self.projects {
                let tail = join_present(&[&p.description, &p.technologies]);
                writeln!(f, "- {}: {}", p.name, tail)?;
            }
        }
        if !self.skills.is_empty() {
            writeln!(f, "Skills: {}", self.skills.join(", "))?;
        }
        if !self.certifications.is_empty() {
            writeln!(f, "Certifications:")?;
            for c in &self.certifications {
                writeln!(f, "- {}", join_present(&[&c.name, &c.issuer, &c.year]))?;
            }
        }
        if !self.references.is_empty() {
            writeln!(f, "References:")?;
            for r in &self.references {
                writeln!(f, "- {}", join_present(&[&r.name, &r.contact, &r.relationship]))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cv::validators::validate;

    fn validated(section: Section, fields: FieldMap) -> ValidatedEntry {
        validate(SectionEntry::from_fields(section, &fields)).unwrap()
    }

    fn education(institution: &str) -> ValidatedEntry {
        validated(
            Section::Education,
            FieldMap::new()
                .with("institution", institution)
                .with("degree", "BSc")
                .with("year", "2020"),
        )
    }

    mod construction {
        use super::*;

        #[test]
        fn from_fields_trims_values() {
            let entry = SectionEntry::from_fields(
                Section::PersonalInfo,
                &FieldMap::new().with("name", "  Jane  ").with("email", " j@x.io "),
            );
            match entry {
                SectionEntry::PersonalInfo(p) => {
                    assert_eq!(p.name, "Jane");
                    assert_eq!(p.email, "j@x.io");
                    assert_eq!(p.phone, "");
                }
                other => panic!("unexpected entry {:?}", other),
            }
        }

        #[test]
        fn from_fields_splits_skills() {
            let entry = SectionEntry::from_fields(
                Section::Skills,
                &FieldMap::new().with("skills", "cooking, driving"),
            );
            assert_eq!(
                entry,
                SectionEntry::Skills(vec!["cooking".into(), "driving".into()])
            );
        }

        #[test]
        fn blank_skills_field_is_empty_list() {
            let entry = SectionEntry::from_fields(Section::Skills, &FieldMap::new());
            assert_eq!(entry, SectionEntry::Skills(vec![]));
        }

        #[test]
        fn entry_reports_its_section() {
            for section in Section::sections() {
                let entry = SectionEntry::from_fields(*section, &FieldMap::new());
                assert_eq!(entry.section(), *section);
            }
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn repeatable_sections_append_in_order() {
            let mut doc = CvDocument::new();
            doc.apply(education("First"));
            doc.apply(education("Second"));

            assert_eq!(doc.education.len(), 2);
            assert_eq!(doc.education[0].institution, "First");
            assert_eq!(doc.education[1].institution, "Second");
        }

        #[test]
        fn summary_is_overwritten() {
            let mut doc = CvDocument::new();
            let summary = |text: &str| {
                validated(Section::Summary, FieldMap::new().with("summary", text))
            };
            doc.apply(summary("I have worked as a teacher for years"));
            doc.apply(summary("I run a small shop selling clothes"));
            assert_eq!(doc.summary.as_deref(), Some("I run a small shop selling clothes"));
        }

        #[test]
        fn skills_extend_and_keep_duplicates() {
            let mut doc = CvDocument::new();
            let skills = validated(Section::Skills, FieldMap::new().with("skills", "a, b"));
            doc.apply(skills.clone());
            doc.apply(skills);
            assert_eq!(doc.skills, vec!["a", "b", "a", "b"]);
        }

        #[test]
        fn entry_count_tracks_records() {
            let mut doc = CvDocument::new();
            assert_eq!(doc.entry_count(Section::Education), 0);
            doc.apply(education("UDSM"));
            assert_eq!(doc.entry_count(Section::Education), 1);
            assert_eq!(doc.entry_count(Section::PersonalInfo), 0);
        }
    }

    mod completeness {
        use super::*;

        #[test]
        fn empty_document_misses_all_required_sections() {
            let doc = CvDocument::new();
            assert_eq!(doc.missing_for_export(), Section::export_required());
        }

        #[test]
        fn whitespace_summary_is_not_meaningful() {
            let doc = CvDocument {
                summary: Some("   ".into()),
                ..Default::default()
            };
            assert!(!doc.has_meaningful_data(Section::Summary));
        }

        #[test]
        fn populated_section_is_meaningful() {
            let mut doc = CvDocument::new();
            doc.apply(education("UDSM"));
            assert!(doc.has_meaningful_data(Section::Education));
            assert!(!doc.missing_for_export().contains(&Section::Education));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn renders_only_present_sections() {
            let mut doc = CvDocument::new();
            doc.apply(education("UDSM"));
            let text = doc.to_string();
            assert!(text.contains("Education:\n- UDSM, BSc, 2020"));
            assert!(!text.contains("Skills:"));
            assert!(!text.contains("Personal Info:"));
        }

        #[test]
        fn personal_info_line_skips_blank_fields() {
            let doc = CvDocument {
                personal_info: Some(PersonalInfo {
                    name: "Jane".into(),
                    email: "".into(),
                    phone: "+255712345678".into(),
                    address: "".into(),
                }),
                ..Default::default()
            };
            assert_eq!(doc.to_string(), "Personal Info: Jane, +255712345678\n");
        }
    }

    #[test]
    fn yaml_round_trip_preserves_document() {
        let mut doc = CvDocument::new();
        doc.apply(education("UDSM"));
        let yaml = serde_yaml::to_string(&doc).unwrap();
        let back: CvDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(doc, back);
    }
}
