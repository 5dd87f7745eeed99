pub mod convert;
pub mod core;
pub mod models;
pub mod template;
pub mod utils;

// Re-export commonly used types and traits
pub use crate::convert::{CommonMarkConverter, ExternalConverter, HtmlSource};
pub use crate::core::{PreviewEngine, RenderError};
pub use crate::models::{MarkdownConfig, RenderConfig};
pub use crate::template::TemplateSource;
