//! URL helper functions

use crate::config::SiteConfig;
use crate::content::Post;

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        config.base_url().to_string()
    } else {
        format!("{}/{}", config.base_url(), path)
    }
}

/// Absolute permalink of a post
pub fn post_permalink(config: &SiteConfig, post: &Post) -> String {
    full_url_for(config, &post.url_path())
}
