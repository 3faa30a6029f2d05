//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::loader::{DEFAULT_EXCERPT_LENGTH, DEFAULT_WORDS_PER_MINUTE};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: Option<String>,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    pub template_dir: String,

    // Writing
    pub excerpt_length: usize,
    pub words_per_minute: u32,

    // Feed
    pub feed_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            email: None,
            language: "en".to_string(),

            url: "http://localhost:8080".to_string(),

            posts_dir: "content/posts".to_string(),
            public_dir: "public".to_string(),
            template_dir: "templates".to_string(),

            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,

            feed_limit: 20,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        tracing::debug!("Loaded site config from {:?}", path);
        Ok(config)
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Author as used by RSS: "email (Name)" when an email is set
    pub fn feed_author(&self) -> String {
        match &self.email {
            Some(email) => format!("{} ({})", email, self.author),
            None => self.author.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.posts_dir, "content/posts");
        assert_eq!(config.excerpt_length, 200);
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.feed_limit, 20);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes
author: Test User
email: test@example.com
url: https://example.com/
words_per_minute: 250
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.words_per_minute, 250);
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.base_url(), "https://example.com");
        assert_eq!(config.feed_author(), "test@example.com (Test User)");
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: [unterminated").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
