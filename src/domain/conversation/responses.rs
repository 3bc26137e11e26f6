//! Fixed assistant wording.

use crate::domain::cv::Section;

pub const ASSISTANT_NAME: &str = "Niajiri";

pub const WELCOME: &str = "Karibu! I'm Niajiri, your CV Building Assistant, here to help everyone, \
tech or non-tech, formal or informal jobs, create a great CV. Let's start! \
You can use the formats I suggest or just chat naturally.";

pub const GREETING: &str = "Nice to hear from you! I'm Niajiri.";

pub const ALL_COMPLETE: &str =
    "All sections complete! Your CV is ready. Would you like to review, export, or get an improved version?";

pub const MENU: &str = "Great! You can review your CV by typing 'review', export it by choosing a \
template (modern, classic or minimal), or get an improved version by typing 'improve'.";

pub const NOT_UNDERSTOOD: &str =
    "Oops! I didn't understand that. Please use the format I suggested or describe it naturally. I'm here to help!";

pub const CLARIFY: &str =
    "I'm not quite sure what you meant. Could you rephrase that, or use the format I suggested?";

pub const IMPROVE_FAILED: &str =
    "I couldn't improve your CV right now, so I kept everything exactly as it was.";

pub fn welcome_back(section: Option<Section>) -> String {
    match section {
        Some(s) => format!("Welcome back! I'm {}. Let's continue with {}.", ASSISTANT_NAME, s.label()),
        None => format!("Welcome back! I'm {}. Your CV is complete.", ASSISTANT_NAME),
    }
}

/// Acknowledgement after an entry is stored.
pub fn entry_added(section: Section) -> &'static str {
    match section {
        Section::PersonalInfo => "Personal information added successfully! Let's move forward.",
        Section::Summary => "Summary added successfully. Great job!",
        Section::Education => "Education entry added successfully! Add another or type 'done' to finish.",
        Section::Experience => "Experience entry added successfully! Add another or type 'done' to finish.",
        Section::Projects => "Project entry added successfully! Add another or type 'done' to finish.",
        Section::Skills => "Skills added successfully! Looking good!",
        Section::Certifications => "Certification added successfully! Add another or type 'done' to finish.",
        Section::References => "Reference entry added successfully! Add another or type 'done' to finish.",
    }
}

/// Acknowledgement that echoes the summary as stored.
pub fn summary_added(summary: &str) -> String {
    format!("Summary added successfully: {}. Great job!", summary.trim_end_matches('.'))
}

pub fn section_done(section: Section) -> String {
    format!("{} entries completed.", section.label())
}

pub fn section_skipped(section: Section, kept: usize) -> String {
    match kept {
        0 => format!("{} skipped, retaining existing data.", section.label()),
        n => format!(
            "{} skipped, retaining existing data ({} {} kept).",
            section.label(),
            n,
            if n == 1 { "entry" } else { "entries" }
        ),
    }
}

pub fn previous_updated(section: Section) -> String {
    format!("Thanks! I've updated your {} with that.", section.label())
}

pub fn review(document: &str) -> String {
    format!("Here's your CV so far:\n{}\n{}", document, MENU)
}

pub fn improved(document: &str) -> String {
    format!(
        "Here's an improved version of your CV based on your details:\n{}\nWould you like to review, export, or adjust it further?",
        document
    )
}

pub fn export_blocked(missing: &[Section]) -> String {
    let names: Vec<&str> = missing.iter().map(Section::as_str).collect();
    format!(
        "Your CV isn't ready to export yet. Missing sections: {}",
        names.join(", ")
    )
}
