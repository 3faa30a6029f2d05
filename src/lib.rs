//! folio: markdown blog engine for a personal portfolio site
//!
//! Posts are markdown files with a YAML front-matter block. The
//! [`content`] module turns a directory of them into [`content::Post`]
//! records; the [`generator`] module writes the blog pages, RSS feed and
//! sitemap from those records.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{LoadError, LoadReport, PostLoader};

/// Name of the site configuration file inside the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the markdown posts
    pub posts_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Optional layout overrides
    pub template_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let template_dir = base_dir.join(&config.template_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
            template_dir,
        }
    }

    /// Post loader configured from the site settings
    pub fn loader(&self) -> PostLoader {
        PostLoader::with_options(self.config.excerpt_length, self.config.words_per_minute)
    }

    /// Load every post in the posts directory
    pub fn load_posts(&self) -> std::result::Result<LoadReport, LoadError> {
        self.loader().load(&self.posts_dir)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self).map(|_| ())
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str) -> Result<PathBuf> {
        commands::new::create_post(self, title, &[])
    }
}
