//! CV module - the section catalog, the document model and its validators.

mod document;
mod fields;
mod section;
pub mod validators;

pub use document::{
    CertificationEntry, CvDocument, EducationEntry, ExperienceEntry, PersonalInfo, ProjectEntry,
    ReferenceEntry, SectionEntry,
};
pub use fields::FieldMap;
pub use section::Section;
pub use validators::{validate, validate_document, DocumentRejection, FieldRejection, ValidatedEntry};
