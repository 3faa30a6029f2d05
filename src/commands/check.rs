//! Validate every post without writing anything

use anyhow::Result;

use crate::Folio;

/// Load all posts and print each failure. Fails when any file is broken.
pub fn run(folio: &Folio) -> Result<()> {
    let report = folio.load_posts()?;

    for err in &report.errors {
        println!("  {}", err);
    }

    if report.is_clean() {
        println!("{} posts OK", report.posts.len());
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} post files failed to load",
            report.errors.len(),
            report.posts.len() + report.errors.len()
        )
    }
}
