pub mod config;

pub use config::{MarkdownConfig, RenderConfig};
