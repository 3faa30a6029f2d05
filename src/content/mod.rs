//! Content module - parses markdown posts into [`Post`] records

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::{LoadError, MalformedReason, PostError};
pub use frontmatter::FrontMatter;
pub use loader::{LoadReport, PostLoader};
pub use markdown::{MarkdownRenderer, RenderedBody};
pub use post::Post;
