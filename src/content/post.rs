//! Post model

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::error::MalformedReason;
use super::frontmatter::FrontMatter;
use super::markdown::RenderedBody;

/// Marker appended to a truncated excerpt
const ELLIPSIS: &str = "...";

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date as written in the front-matter
    pub date: String,

    /// Publication date, parsed
    pub published: DateTime<Utc>,

    /// SEO / summary description
    pub description: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Preview text for listings
    pub excerpt: String,

    /// Rendered HTML content
    pub content: String,

    /// URL-friendly name derived from the title
    pub slug: String,

    /// Minutes to read
    pub reading_time: u32,

    pub word_count: usize,

    /// File the post was loaded from
    pub source: PathBuf,
}

impl Post {
    /// Assemble a post from its parsed parts, deriving slug, excerpt and
    /// reading time.
    pub fn build(
        fm: FrontMatter,
        body: RenderedBody,
        source: PathBuf,
        excerpt_length: usize,
        words_per_minute: u32,
    ) -> Result<Self, MalformedReason> {
        let slug = Self::generate_slug(&fm.title);
        if slug.is_empty() {
            return Err(MalformedReason::EmptySlug);
        }

        let excerpt = fm
            .excerpt
            .unwrap_or_else(|| Self::generate_excerpt(&body.text, excerpt_length));
        let reading_time = Self::calculate_reading_time(body.word_count, words_per_minute);

        Ok(Self {
            title: fm.title,
            date: fm.date,
            published: fm.published,
            description: fm.description,
            tags: fm.tags,
            excerpt,
            content: body.html,
            slug,
            reading_time,
            word_count: body.word_count,
            source,
        })
    }

    /// Lowercase, with every run of non-alphanumeric characters collapsed
    /// into one hyphen and no hyphen at either end. Unicode letters and
    /// digits are kept as they are.
    pub fn generate_slug(title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        let mut pending_hyphen = false;

        for c in title.chars().flat_map(char::to_lowercase) {
            if c.is_alphanumeric() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
            } else {
                pending_hyphen = true;
            }
        }

        slug
    }

    /// Whole minutes, rounded up, never below one
    pub fn calculate_reading_time(word_count: usize, words_per_minute: u32) -> u32 {
        let wpm = words_per_minute.max(1) as usize;
        (word_count.div_ceil(wpm) as u32).max(1)
    }

    /// Cut `text` to at most `limit` characters, backing off to the last
    /// word boundary, and mark the cut with an ellipsis.
    pub fn generate_excerpt(text: &str, limit: usize) -> String {
        let text = text.trim();
        let cut_at = match text.char_indices().nth(limit) {
            Some((idx, _)) => idx,
            None => return text.to_string(),
        };

        let head = &text[..cut_at];
        let next_is_space = text[cut_at..].starts_with(char::is_whitespace);

        let head = if next_is_space {
            head.trim_end()
        } else {
            match head.rfind(char::is_whitespace) {
                Some(ws) => head[..ws].trim_end(),
                // a single word longer than the limit
                None => head,
            }
        };

        format!("{}{}", head, ELLIPSIS)
    }

    /// Date like "January 05, 2024"
    pub fn formatted_date(&self) -> String {
        self.published.format("%B %d, %Y").to_string()
    }

    /// Date in RFC 3339
    pub fn iso_date(&self) -> String {
        self.published.to_rfc3339()
    }

    /// Site-relative URL of the post page
    pub fn url_path(&self) -> String {
        format!("/blog/{}/", self.slug)
    }

    /// Get the newer neighbour in a newest-first list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the older neighbour in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, date: &str) -> Post {
        let content = format!(
            "---\ntitle: {}\ndate: {}\ndescription: d\n---\n",
            title, date
        );
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        Post::build(fm, RenderedBody::default(), PathBuf::from("x.md"), 200, 200).unwrap()
    }

    #[test]
    fn test_slug_rules() {
        assert_eq!(Post::generate_slug("Hello World"), "hello-world");
        assert_eq!(Post::generate_slug("Hello, World!"), "hello-world");
        assert_eq!(Post::generate_slug("  --Rust & WASM: 2024--  "), "rust-wasm-2024");
        assert_eq!(Post::generate_slug("?!"), "");
    }

    #[test]
    fn test_slug_keeps_unicode_letters() {
        assert_eq!(Post::generate_slug("Crème Brûlée"), "crème-brûlée");
        assert_eq!(Post::generate_slug("你好世界"), "你好世界");
        assert_ne!(Post::generate_slug("Café"), Post::generate_slug("Cafe"));
    }

    #[test]
    fn test_slug_is_idempotent() {
        let once = Post::generate_slug("Async Rust: Pinning, Explained");
        assert_eq!(Post::generate_slug(&once), once);
        assert_eq!(
            Post::generate_slug("Async Rust: Pinning, Explained"),
            once
        );
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(Post::calculate_reading_time(1000, 200), 5);
        assert_eq!(Post::calculate_reading_time(1001, 200), 6);
        assert_eq!(Post::calculate_reading_time(0, 200), 1);
        assert_eq!(Post::calculate_reading_time(10, 0), 10);
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(Post::generate_excerpt("  short text ", 200), "short text");
    }

    #[test]
    fn test_excerpt_cuts_at_word_boundary() {
        assert_eq!(
            Post::generate_excerpt("alpha beta gamma", 8),
            "alpha..."
        );
        assert_eq!(
            Post::generate_excerpt("alpha beta gamma", 10),
            "alpha beta..."
        );
    }

    #[test]
    fn test_excerpt_long_word_hard_cut() {
        assert_eq!(Post::generate_excerpt("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_excerpt_counts_chars_not_bytes() {
        assert_eq!(Post::generate_excerpt("héllo wörld über", 11), "héllo wörld...");
    }

    #[test]
    fn test_empty_slug_rejected() {
        let (fm, _) =
            FrontMatter::parse("---\ntitle: \"!!!\"\ndate: 2024-01-01\ndescription: d\n---\n")
                .unwrap();
        let err = Post::build(fm, RenderedBody::default(), PathBuf::from("x.md"), 200, 200)
            .unwrap_err();
        assert_eq!(err, MalformedReason::EmptySlug);
    }

    #[test]
    fn test_formatted_dates() {
        let post = sample("T", "2024-01-05");
        assert_eq!(post.formatted_date(), "January 05, 2024");
        assert_eq!(post.iso_date(), "2024-01-05T00:00:00+00:00");
        assert_eq!(post.url_path(), "/blog/t/");
    }

    #[test]
    fn test_prev_next() {
        let posts = vec![
            sample("Newest", "2024-03-01"),
            sample("Middle", "2024-02-01"),
            sample("Oldest", "2024-01-01"),
        ];
        assert!(posts[0].prev(&posts).is_none());
        assert_eq!(posts[1].prev(&posts).unwrap().slug, "newest");
        assert_eq!(posts[1].next(&posts).unwrap().slug, "oldest");
        assert!(posts[2].next(&posts).is_none());
    }
}
