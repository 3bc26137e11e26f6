//! HTTP adapter for CV assistant endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, ExportQuery, ImproveResponse, MessageRequest, MessageResponse, SectionView,
    StartSessionResponse,
};
pub use handlers::CvHandlers;
pub use routes::cv_routes;
