//! Create a new post

use anyhow::{bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::Post;
use crate::Folio;

/// Write a new post skeleton named after the title's slug.
/// Returns the path of the created file.
pub fn create_post(folio: &Folio, title: &str, tags: &[String]) -> Result<PathBuf> {
    let slug = Post::generate_slug(title);
    if slug.is_empty() {
        bail!("Title {:?} does not produce a usable slug", title);
    }

    fs::create_dir_all(&folio.posts_dir)?;
    let file_path = folio.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    // JSON strings and arrays are valid YAML flow scalars/sequences
    let quoted_title = serde_json::to_string(title)?;
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndescription: {}\ntags: {}\n---\n\n",
        quoted_title,
        chrono::Local::now().format("%Y-%m-%d"),
        quoted_title,
        serde_json::to_string(tags)?
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
