//! Helper functions shared by the page, feed and sitemap writers

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
