//! Generator module - writes the blog pages, feed, sitemap and robots.txt

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{
    absolutize_urls, escape_xml, full_url_for, post_permalink, rss_date, sitemap_date,
    strip_invalid_xml_chars,
};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Hand-written robots.txt copied over the generated one, relative to the
/// site root
pub const ROBOTS_OVERRIDE: &str = "static/robots.txt";

/// Static site generator
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::load(folio.config.clone(), &folio.template_dir)?;
        Ok(Self {
            folio: folio.clone(),
            renderer,
        })
    }

    /// Generate every output file from `posts` (newest first).
    /// Returns the number of files written.
    pub fn generate(&self, posts: &[Post]) -> Result<usize> {
        let public_dir = &self.folio.public_dir;
        let config = &self.folio.config;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        let mut written = 0;

        write_file(
            &public_dir.join("blog").join("index.html"),
            &self.renderer.render_index(posts),
        )?;
        written += 1;

        for post in posts {
            let path = public_dir.join("blog").join(&post.slug).join("index.html");
            write_file(&path, &self.renderer.render_post(post, posts))?;
            written += 1;
        }
        tracing::info!("Generated {} post pages", posts.len());

        write_file(&public_dir.join("feed.xml"), &build_feed(config, posts))?;
        tracing::info!("Generated feed.xml");

        write_file(&public_dir.join("sitemap.xml"), &build_sitemap(config, posts))?;
        tracing::info!("Generated sitemap.xml");

        let json = serde_json::to_string_pretty(posts)?;
        write_file(&public_dir.join("posts.json"), &json)?;
        tracing::info!("Generated posts.json");

        let robots_override = self.folio.base_dir.join(ROBOTS_OVERRIDE);
        let robots = if robots_override.is_file() {
            tracing::debug!("Using {:?}", robots_override);
            fs::read_to_string(&robots_override)
                .with_context(|| format!("Failed to read {:?}", robots_override))?
        } else {
            build_robots(config)
        };
        write_file(&public_dir.join("robots.txt"), &robots)?;

        write_file(
            &public_dir.join("404.html"),
            &self.renderer.render_not_found(),
        )?;
        tracing::info!("Generated robots.txt and 404.html");

        Ok(written + 5)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}

/// Build the RSS 2.0 feed for the newest `feed_limit` posts
pub fn build_feed(config: &SiteConfig, posts: &[Post]) -> String {
    let base_url = config.base_url();
    let mut feed = String::new();

    feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:content="http://purl.org/rss/1.0/modules/content/">"#);
    feed.push('\n');
    feed.push_str("<channel>\n");
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!("  <link>{}</link>\n", escape_xml(base_url)));
    feed.push_str(&format!(
        "  <description>{}</description>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "  <language>{}</language>\n",
        escape_xml(&config.language)
    ));
    feed.push_str(&format!(
        "  <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\"/>\n",
        escape_xml(&full_url_for(config, "feed.xml"))
    ));
    feed.push_str(&format!(
        "  <generator>folio {}</generator>\n",
        env!("CARGO_PKG_VERSION")
    ));
    if config.email.is_some() {
        feed.push_str(&format!(
            "  <managingEditor>{}</managingEditor>\n",
            escape_xml(&config.feed_author())
        ));
    }
    // Newest post date keeps the feed byte-stable between builds
    if let Some(newest) = posts.first() {
        feed.push_str(&format!(
            "  <lastBuildDate>{}</lastBuildDate>\n",
            rss_date(&newest.published)
        ));
    }

    for post in posts.iter().take(config.feed_limit) {
        let link = escape_xml(&post_permalink(config, post));
        feed.push_str("  <item>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link>{}</link>\n", link));
        feed.push_str(&format!(
            "    <guid isPermaLink=\"true\">{}</guid>\n",
            link
        ));
        feed.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&post.description)
        ));
        feed.push_str(&format!(
            "    <pubDate>{}</pubDate>\n",
            rss_date(&post.published)
        ));
        if config.email.is_some() {
            feed.push_str(&format!(
                "    <author>{}</author>\n",
                escape_xml(&config.feed_author())
            ));
        }
        for tag in &post.tags {
            feed.push_str(&format!("    <category>{}</category>\n", escape_xml(tag)));
        }
        let content = strip_invalid_xml_chars(&absolutize_urls(&post.content, base_url));
        feed.push_str(&format!(
            "    <content:encoded><![CDATA[{}]]></content:encoded>\n",
            content.replace("]]>", "]]]]><![CDATA[>")
        ));
        feed.push_str("  </item>\n");
    }

    feed.push_str("</channel>\n");
    feed.push_str("</rss>\n");
    feed
}

/// Build the XML sitemap: fixed pages first, then posts newest first with
/// priority falling off by recency
pub fn build_sitemap(config: &SiteConfig, posts: &[Post]) -> String {
    let mut sitemap = String::new();
    sitemap.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    sitemap.push('\n');
    sitemap.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    sitemap.push('\n');

    let fixed = [
        ("/", "weekly", 1.0),
        ("/blog/", "weekly", 0.9),
        ("/feed.xml", "daily", 0.5),
    ];
    for (path, changefreq, priority) in fixed {
        push_url(
            &mut sitemap,
            &full_url_for(config, path),
            None,
            changefreq,
            priority,
        );
    }

    for (index, post) in posts.iter().enumerate() {
        let priority = match index {
            0..=4 => 0.8,
            5..=9 => 0.7,
            _ => 0.6,
        };
        push_url(
            &mut sitemap,
            &post_permalink(config, post),
            Some(sitemap_date(&post.published)),
            "monthly",
            priority,
        );
    }

    sitemap.push_str("</urlset>\n");
    sitemap
}

/// Allow everything and point crawlers at the sitemap
pub fn build_robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        full_url_for(config, "sitemap.xml")
    )
}

fn push_url(
    sitemap: &mut String,
    loc: &str,
    lastmod: Option<String>,
    changefreq: &str,
    priority: f32,
) {
    sitemap.push_str("  <url>\n");
    sitemap.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    if let Some(lastmod) = lastmod {
        sitemap.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
    }
    sitemap.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    sitemap.push_str(&format!("    <priority>{:.1}</priority>\n", priority));
    sitemap.push_str("  </url>\n");
}
