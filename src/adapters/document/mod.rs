//! Document adapters - Implementations for CV rendering.
//!
//! - `TemplateCvRenderer` - Renders a CV to self-contained HTML in a named template

mod template_renderer;

pub use template_renderer::TemplateCvRenderer;
