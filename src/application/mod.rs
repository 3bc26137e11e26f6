//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Each caller-facing operation is one Command (or Query), one Handler and
//! one Error type.

pub mod handlers;

pub use handlers::{
    DocumentImprover, ExportDocumentCommand, ExportDocumentError, ExportDocumentHandler,
    ExportOutcome, GetCurrentSectionError, GetCurrentSectionHandler, GetCurrentSectionQuery,
    GetDocumentError, GetDocumentHandler, GetDocumentQuery, ImproveDocumentCommand,
    ImproveDocumentError, ImproveDocumentHandler, ImproveDocumentResult, ProcessInputCommand,
    ProcessInputError, ProcessInputHandler, ProcessInputResult, SessionLocks,
    StartSessionCommand, StartSessionError, StartSessionHandler, StartSessionResult,
    UpdateDocumentCommand, UpdateDocumentError, UpdateDocumentHandler,
};
