//! Section catalog - the fixed, ordered list of CV sections.
//!
//! The catalog is static configuration: ordering, repeatability, prompt text
//! and required fields. Ordering defines the only forward path through a
//! conversation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One named subdivision of the CV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    PersonalInfo,
    Summary,
    Education,
    Experience,
    Projects,
    Skills,
    Certifications,
    References,
}

/// Sections in conversation order.
const ORDER: [Section; 8] = [
    Section::PersonalInfo,
    Section::Summary,
    Section::Education,
    Section::Experience,
    Section::Projects,
    Section::Skills,
    Section::Certifications,
    Section::References,
];

/// Sections that must hold meaningful data before the CV can be exported.
const EXPORT_REQUIRED: [Section; 5] = [
    Section::PersonalInfo,
    Section::Summary,
    Section::Experience,
    Section::Education,
    Section::Skills,
];

impl Section {
    /// Returns all sections in conversation order.
    pub fn sections() -> &'static [Section] {
        &ORDER
    }

    /// Returns the sections the export gate checks.
    pub fn export_required() -> &'static [Section] {
        &EXPORT_REQUIRED
    }

    /// Returns the first section of every conversation.
    pub fn first() -> Self {
        ORDER[0]
    }

    /// Returns the section after this one, or `None` for the last section.
    pub fn next(&self) -> Option<Self> {
        ORDER.get(self.index() + 1).copied()
    }

    /// Position of this section in the catalog.
    pub fn index(&self) -> usize {
        match self {
            Self::PersonalInfo => 0,
            Self::Summary => 1,
            Self::Education => 2,
            Self::Experience => 3,
            Self::Projects => 4,
            Self::Skills => 5,
            Self::Certifications => 6,
            Self::References => 7,
        }
    }

    /// Returns true if this section comes before `other` in the catalog.
    pub fn is_before(&self, other: &Section) -> bool {
        self.index() < other.index()
    }

    /// Returns true if the section accepts multiple ordered entries.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self,
            Self::Education
                | Self::Experience
                | Self::Projects
                | Self::Certifications
                | Self::References
        )
    }

    /// Stable identifier used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "personal_info",
            Self::Summary => "summary",
            Self::Education => "education",
            Self::Experience => "experience",
            Self::Projects => "projects",
            Self::Skills => "skills",
            Self::Certifications => "certifications",
            Self::References => "references",
        }
    }

    /// Human-readable label ("Personal Info").
    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "Personal Info",
            Self::Summary => "Summary",
            Self::Education => "Education",
            Self::Experience => "Experience",
            Self::Projects => "Projects",
            Self::Skills => "Skills",
            Self::Certifications => "Certifications",
            Self::References => "References",
        }
    }

    /// Field names a complete entry must carry.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::PersonalInfo => &["name"],
            Self::Summary => &["summary"],
            Self::Education => &["institution", "degree", "year"],
            Self::Experience => &["company", "role", "start_date", "end_date", "description"],
            Self::Projects => &["name", "description"],
            Self::Skills => &["skills"],
            Self::Certifications => &["name", "issuer", "year"],
            Self::References => &["name", "contact"],
        }
    }

    /// All field names the section understands, required ones first.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::PersonalInfo => &["name", "email", "phone", "address"],
            Self::Summary => &["summary"],
            Self::Education => &["institution", "degree", "year", "details"],
            Self::Experience => &["company", "role", "start_date", "end_date", "description"],
            Self::Projects => &["name", "description", "technologies"],
            Self::Skills => &["skills"],
            Self::Certifications => &["name", "issuer", "year"],
            Self::References => &["name", "contact", "relationship"],
        }
    }

    /// The question asked while this section is active.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::PersonalInfo => {
                "Please tell me your personal details (name, email, phone, address). \
                 You can type them like: name, email, phone, address \
                 (e.g., John Doe, john@example.com, +255712345678, Dar es Salaam), \
                 or just describe them naturally if that's easier."
            }
            Self::Summary => {
                "Tell me a bit about yourself professionally. For example, say something like \
                 'I've worked as a teacher for 3 years' or 'I run a small shop.'"
            }
            Self::Education => {
                "Let me know about your education or training. \
                 Try: school, course, year, extra details \
                 (e.g., University of Dar es Salaam, Certificate in IT, 2020), \
                 or describe it naturally. Type 'done' when finished or 'skip' to move on."
            }
            Self::Experience => {
                "Share your work or activity history. \
                 Use: company, role, start date, end date, description \
                 (e.g., Vodacom, Sales Assistant, 01/2021, now, Helped customers), \
                 or describe naturally. Type 'done' when finished or 'skip' to move on."
            }
            Self::Projects => {
                "Tell me about a project or task you've done. \
                 Try: name, description, tools \
                 (e.g., My Shop Website, Online store, WordPress), \
                 or describe naturally. Type 'done' when finished or 'skip' to move on."
            }
            Self::Skills => {
                "List any skills you have (e.g., cooking, coding, driving). \
                 Just type them like: skill1, skill2, ... or describe them naturally."
            }
            Self::Certifications => {
                "Mention any certificates or awards. \
                 Try: name, issuer, year (e.g., First Aid, Red Cross, 2022), \
                 or describe naturally. Type 'done' when finished or 'skip' to move on."
            }
            Self::References => {
                "Add someone who can vouch for you. \
                 Use: name, contact, relationship (e.g., Amina Hassan, amina@example.com, Boss), \
                 or describe naturally. Type 'done' when finished or 'skip' to move on."
            }
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Section {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ORDER
            .iter()
            .copied()
            .find(|section| section.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_format("section", format!("unknown section '{}'", s)))
    }
}
