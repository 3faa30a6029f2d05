//! Page layouts for the blog index and post pages
//!
//! A layout is plain HTML with a few placeholders:
//! `{{ title }}`, `{{ description }}`, `{{ lang }}`, `{{ head }}` and the
//! `<!-- BLOG_POSTS -->` marker where the generated markup goes. Files named
//! `blog.html`, `post.html` and `404.html` in the template directory replace
//! the built-in layouts.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{feed_tag, html_escape, link_to, meta_generator};

/// Marker replaced by the generated listing or article
pub const CONTENT_MARKER: &str = "<!-- BLOG_POSTS -->";

const DEFAULT_BLOG: &str = include_str!("default/blog.html");
const DEFAULT_POST: &str = include_str!("default/post.html");
const DEFAULT_NOT_FOUND: &str = include_str!("default/404.html");

const PLACEHOLDERS: [&str; 5] = [
    "{{ title }}",
    "{{ description }}",
    "{{ lang }}",
    "{{ head }}",
    CONTENT_MARKER,
];

/// Values substituted into a layout
struct PageVars<'a> {
    title: &'a str,
    description: &'a str,
    body: &'a str,
}

/// Renders blog pages from the two layouts
pub struct TemplateRenderer {
    blog: String,
    post: String,
    not_found: String,
    config: SiteConfig,
}

impl TemplateRenderer {
    /// Create a renderer with the built-in layouts
    pub fn new(config: SiteConfig) -> Self {
        Self {
            blog: DEFAULT_BLOG.to_string(),
            post: DEFAULT_POST.to_string(),
            not_found: DEFAULT_NOT_FOUND.to_string(),
            config,
        }
    }

    /// Create a renderer, preferring layouts found in `template_dir`
    pub fn load(config: SiteConfig, template_dir: &Path) -> Result<Self> {
        let mut renderer = Self::new(config);
        if let Some(blog) = read_layout(template_dir, "blog.html")? {
            renderer.blog = blog;
        }
        if let Some(post) = read_layout(template_dir, "post.html")? {
            renderer.post = post;
        }
        if let Some(not_found) = read_layout(template_dir, "404.html")? {
            renderer.not_found = not_found;
        }
        Ok(renderer)
    }

    /// Render the blog index listing every post
    pub fn render_index(&self, posts: &[Post]) -> String {
        let mut listing = String::new();
        for post in posts {
            listing.push_str(&format!(
                r#"<article class="blog-post">
  {}
  <div class="blog-post-meta">Published on <time datetime="{}">{}</time> · {} min read</div>
  <div class="blog-post-description">{}</div>
</article>
"#,
                link_to(&post.url_path(), &post.title),
                post.date,
                post.formatted_date(),
                post.reading_time,
                html_escape(&post.description)
            ));
        }

        self.fill(
            &self.blog,
            PageVars {
                title: &self.config.title,
                description: &self.config.description,
                body: &listing,
            },
        )
    }

    /// Render one post page; `posts` is the newest-first list used for
    /// previous/next links
    pub fn render_post(&self, post: &Post, posts: &[Post]) -> String {
        let tags = if post.tags.is_empty() {
            String::new()
        } else {
            let items: Vec<String> = post
                .tags
                .iter()
                .map(|t| format!(r#"<li class="tag">{}</li>"#, html_escape(t)))
                .collect();
            format!("\n  <ul class=\"blog-post-tags\">{}</ul>", items.join(""))
        };

        let mut nav = Vec::new();
        if let Some(newer) = post.prev(posts) {
            nav.push(format!(
                r#"<span class="newer">{}</span>"#,
                link_to(&newer.url_path(), &newer.title)
            ));
        }
        if let Some(older) = post.next(posts) {
            nav.push(format!(
                r#"<span class="older">{}</span>"#,
                link_to(&older.url_path(), &older.title)
            ));
        }

        let article = format!(
            r#"<article class="blog-post">
  <h1>{}</h1>
  <div class="blog-post-meta">Published on <time datetime="{}">{}</time> · {} min read</div>{}
  <div class="blog-post-content">{}</div>
</article>
<nav class="blog-post-nav">{}</nav>
"#,
            html_escape(&post.title),
            post.date,
            post.formatted_date(),
            post.reading_time,
            tags,
            post.content,
            nav.join("")
        );

        self.fill(
            &self.post,
            PageVars {
                title: &post.title,
                description: &post.description,
                body: &article,
            },
        )
    }

    /// Render the page served for unknown URLs
    pub fn render_not_found(&self) -> String {
        let body = format!(
            "<p>The requested page could not be found.</p>\n    {}",
            link_to("/", "Go home")
        );
        self.fill(
            &self.not_found,
            PageVars {
                title: "404 - Page Not Found",
                description: &self.config.description,
                body: &body,
            },
        )
    }

    /// Substitute every placeholder in one pass over the layout, so values
    /// are never scanned for placeholders themselves
    fn fill(&self, layout: &str, vars: PageVars) -> String {
        let head = format!("{}\n  {}", feed_tag(&self.config), meta_generator());
        let title = html_escape(vars.title);
        let description = html_escape(vars.description);
        let lang = html_escape(&self.config.language);

        let mut out = String::with_capacity(layout.len() + vars.body.len());
        let mut rest = layout;
        while let Some((pos, placeholder)) = next_placeholder(rest) {
            out.push_str(&rest[..pos]);
            out.push_str(match placeholder {
                "{{ title }}" => title.as_str(),
                "{{ description }}" => description.as_str(),
                "{{ lang }}" => lang.as_str(),
                "{{ head }}" => head.as_str(),
                _ => vars.body,
            });
            rest = &rest[pos + placeholder.len()..];
        }
        out.push_str(rest);
        out
    }
}

fn next_placeholder(s: &str) -> Option<(usize, &'static str)> {
    PLACEHOLDERS
        .iter()
        .filter_map(|p| s.find(p).map(|pos| (pos, *p)))
        .min_by_key(|(pos, _)| *pos)
}

fn read_layout(template_dir: &Path, name: &str) -> Result<Option<String>> {
    let path = template_dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }

    let layout =
        fs::read_to_string(&path).with_context(|| format!("Failed to read layout {:?}", path))?;
    if !layout.contains(CONTENT_MARKER) {
        tracing::warn!("Layout {:?} has no {} marker", path, CONTENT_MARKER);
    }
    tracing::debug!("Using layout {:?}", path);
    Ok(Some(layout))
}
