pub mod anchor;
pub mod engine;
pub mod error;
pub mod sanitize;

pub use engine::PreviewEngine;
pub use error::RenderError;
