//! List site content

use anyhow::Result;

use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let report = folio.load_posts()?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", report.posts.len());
            for post in &report.posts {
                println!(
                    "  {} - {} [{}] {} min",
                    post.published.format("%Y-%m-%d"),
                    post.title,
                    post.slug,
                    post.reading_time
                );
            }
        }
        "tag" | "tags" => {
            let tags = report.tags();
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    if !report.is_clean() {
        println!("Skipped {} broken file(s); run `folio check` for details", report.errors.len());
    }

    Ok(())
}
