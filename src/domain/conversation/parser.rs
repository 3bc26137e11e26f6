//! Structured input parsing (comma-delimited, positional).
//!
//! Returns `None` whenever the message does not carry enough tokens for the
//! section. That is never an error: the caller falls through to
//! natural-language extraction.

use crate::domain::cv::{FieldMap, Section};

/// Positional layout of a section's structured input.
struct Arity {
    /// Leading fields, one token each.
    leading: &'static [&'static str],
    /// Field receiving the remaining tokens re-joined with ", ".
    trailing: Option<&'static str>,
    /// Minimum token count.
    min: usize,
    /// Maximum token count, if bounded.
    max: Option<usize>,
}

fn arity(section: Section) -> Option<Arity> {
    let a = match section {
        Section::PersonalInfo => Arity {
            leading: &["name", "email", "phone"],
            trailing: Some("address"),
            min: 3,
            max: None,
        },
        Section::Education => Arity {
            leading: &["institution", "degree", "year"],
            trailing: Some("details"),
            min: 3,
            max: None,
        },
        Section::Experience => Arity {
            leading: &["company", "role", "start_date", "end_date"],
            trailing: Some("description"),
            min: 5,
            max: None,
        },
        Section::Projects => Arity {
            leading: &["name", "description"],
            trailing: Some("technologies"),
            min: 2,
            max: None,
        },
        Section::Certifications => Arity {
            leading: &["name", "issuer", "year"],
            trailing: None,
            min: 3,
            max: Some(3),
        },
        Section::References => Arity {
            leading: &["name", "contact"],
            trailing: Some("relationship"),
            min: 2,
            max: None,
        },
        Section::Summary | Section::Skills => return None,
    };
    Some(a)
}

/// Splits on commas and trims every token.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(',').map(str::trim).collect()
}

/// Attempts a structured parse of `text` for `section`.
pub fn parse_structured(section: Section, text: &str) -> Option<FieldMap> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match section {
        Section::Summary => return Some(FieldMap::new().with("summary", text)),
        Section::Skills => {
            let skills: Vec<&str> = tokenize(text).into_iter().filter(|t| !t.is_empty()).collect();
            if skills.is_empty() {
                return None;
            }
            return Some(FieldMap::new().with("skills", skills.join(", ")));
        }
        _ => {}
    }

    let layout = arity(section)?;
    let tokens = tokenize(text);
    if tokens.len() < layout.min || layout.max.is_some_and(|max| tokens.len() > max) {
        return None;
    }

    let mut fields: FieldMap = layout
        .leading
        .iter()
        .zip(tokens.iter())
        .map(|(k, v)| (*k, *v))
        .collect();
    if let Some(trailing) = layout.trailing {
        let rest = tokens.get(layout.leading.len()..).unwrap_or(&[]);
        fields.insert(trailing, rest.join(", "));
    }
    Some(fields)
}
