//! CV assistant command and query handlers.
//!
//! Handlers that mutate a session take its lock from the shared
//! [`SessionLocks`] for the whole load-mutate-save span.

mod export_document;
mod get_current_section;
mod get_document;
mod improve_document;
mod process_input;
mod session_locks;
mod start_session;
mod update_document;

#[cfg(test)]
pub(crate) mod test_support;

pub use export_document::{
    ExportDocumentCommand, ExportDocumentError, ExportDocumentHandler, ExportOutcome,
};
pub use get_current_section::{
    GetCurrentSectionError, GetCurrentSectionHandler, GetCurrentSectionQuery,
};
pub use get_document::{GetDocumentError, GetDocumentHandler, GetDocumentQuery};
pub use improve_document::{
    DocumentImprover, ImproveDocumentCommand, ImproveDocumentError, ImproveDocumentHandler,
    ImproveDocumentResult,
};
pub use process_input::{
    ProcessInputCommand, ProcessInputError, ProcessInputHandler, ProcessInputResult,
};
pub use session_locks::SessionLocks;
pub use start_session::{StartSessionCommand, StartSessionError, StartSessionHandler, StartSessionResult};
pub use update_document::{UpdateDocumentCommand, UpdateDocumentError, UpdateDocumentHandler};
