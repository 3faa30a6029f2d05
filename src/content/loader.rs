//! Content loader - loads posts from the posts directory

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use super::error::{LoadError, MalformedReason, PostError};
use super::{FrontMatter, MarkdownRenderer, Post};

/// Default excerpt length in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;

/// Default reading speed in words per minute
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Result of one load pass: every post that parsed plus every file that
/// did not
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Posts, newest first
    pub posts: Vec<Post>,
    /// Per-file failures, in file-name order
    pub errors: Vec<PostError>,
}

impl LoadReport {
    /// True when every markdown file loaded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Look up a post by slug
    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Tag names with their post counts, most used first
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for post in &self.posts {
            for tag in &post.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<_> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags
    }
}

/// Loads posts from a directory of markdown files
pub struct PostLoader {
    renderer: MarkdownRenderer,
    excerpt_length: usize,
    words_per_minute: u32,
}

impl PostLoader {
    /// Create a loader with the default excerpt length and reading speed
    pub fn new() -> Self {
        Self::with_options(DEFAULT_EXCERPT_LENGTH, DEFAULT_WORDS_PER_MINUTE)
    }

    /// Create with custom settings
    pub fn with_options(excerpt_length: usize, words_per_minute: u32) -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
            excerpt_length,
            words_per_minute,
        }
    }

    /// Load every markdown file directly inside `dir`.
    ///
    /// Broken files are reported in [`LoadReport::errors`] and never stop
    /// their siblings from loading. Only an unreadable directory fails the
    /// whole call.
    pub fn load(&self, dir: &Path) -> Result<LoadReport, LoadError> {
        let unreadable = |source: io::Error| LoadError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(dir).map_err(unreadable)?;
        if !metadata.is_dir() {
            return Err(unreadable(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }
        fs::read_dir(dir).map_err(unreadable)?;

        let mut report = LoadReport::default();
        let mut seen_slugs = HashSet::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("failed to walk directory"));
                        return Err(unreadable(source));
                    }
                    let Some(path) = e.path().map(Path::to_path_buf) else {
                        continue;
                    };
                    if is_markdown_file(&path) {
                        tracing::warn!("Failed to stat post {:?}: {}", path, e);
                        let source = e
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("symlink loop"));
                        report.errors.push(PostError::Read { path, source });
                    }
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(post) => {
                    if seen_slugs.insert(post.slug.clone()) {
                        tracing::debug!("Loaded post {:?} as {}", path, post.slug);
                        report.posts.push(post);
                    } else {
                        tracing::warn!("Duplicate slug {} in {:?}", post.slug, path);
                        report.errors.push(PostError::malformed(
                            path,
                            MalformedReason::DuplicateSlug(post.slug),
                        ));
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load post: {}", e);
                    report.errors.push(e);
                }
            }
        }

        // Sort by date descending (newest first)
        report.posts.sort_by(|a, b| {
            b.published
                .cmp(&a.published)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        tracing::info!(
            "Loaded {} posts from {:?} ({} failed)",
            report.posts.len(),
            dir,
            report.errors.len()
        );

        Ok(report)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post, PostError> {
        let content = fs::read_to_string(path).map_err(|source| PostError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_post(&content, path)
    }

    /// Parse a post from file contents; `path` is only recorded, not read
    pub fn parse_post(&self, content: &str, path: &Path) -> Result<Post, PostError> {
        let (fm, body) =
            FrontMatter::parse(content).map_err(|reason| PostError::malformed(path, reason))?;

        let rendered = self
            .renderer
            .render(body)
            .map_err(|_| PostError::MarkdownRender {
                path: path.to_path_buf(),
            })?;

        Post::build(
            fm,
            rendered,
            path.to_path_buf(),
            self.excerpt_length,
            self.words_per_minute,
        )
        .map_err(|reason| PostError::malformed(path, reason))
    }
}

impl Default for PostLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn post_file(title: &str, date: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ndescription: About {}\ntags: [\"rust\"]\n---\n\nBody of {}.\n",
            title, date, title, title
        )
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("Twenty Three", "2023-01-01"));
        write(&dir, "b.md", &post_file("Twenty Four", "2024-01-01"));
        write(&dir, "c.md", &post_file("Twenty Two", "2022-01-01"));

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert!(report.is_clean());
        let dates: Vec<_> = report.posts.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2023-01-01", "2022-01-01"]);
    }

    #[test]
    fn test_duplicate_slug_reported_for_second_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("Hello World", "2024-01-01"));
        write(&dir, "b.md", &post_file("\"Hello, World!\"", "2024-02-01"));

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.posts[0].title, "Hello World");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path(), dir.path().join("b.md"));
        assert_eq!(
            report.errors[0].reason(),
            Some(&MalformedReason::DuplicateSlug("hello-world".to_string()))
        );
    }

    #[test]
    fn test_accented_titles_do_not_collide() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("Café", "2024-01-01"));
        write(&dir, "b.md", &post_file("Cafe", "2024-02-01"));

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert!(report.is_clean(), "{:?}", report.errors);
        assert!(report.find("café").is_some());
        assert!(report.find("cafe").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_read_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.md", &post_file("Good", "2024-01-01"));
        std::os::unix::fs::symlink(dir.path().join("missing.md"), dir.path().join("link.md"))
            .unwrap();

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.posts[0].slug, "good");
        match &report.errors[..] {
            [PostError::Read { path, .. }] => assert_eq!(path, &dir.path().join("link.md")),
            other => panic!("unexpected errors: {:?}", other),
        }
    }

    #[test]
    fn test_missing_date_isolated() {
        let dir = TempDir::new().unwrap();
        write(&dir, "good.md", &post_file("Good", "2024-01-01"));
        write(
            &dir,
            "nodate.md",
            "---\ntitle: No Date\ndescription: d\n---\nbody\n",
        );

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.posts[0].slug, "good");
        assert!(report.find("no-date").is_none());

        match &report.errors[..] {
            [PostError::Malformed { path, reason }] => {
                assert_eq!(path, &dir.path().join("nodate.md"));
                assert_eq!(reason, &MalformedReason::MissingRequiredField("date"));
            }
            other => panic!("unexpected errors: {:?}", other),
        }
    }

    #[test]
    fn test_all_failures_accumulated() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1.md", "no frontmatter here");
        write(&dir, "2.md", "---\ntitle: T\ndate: nope\ndescription: d\n---\n");
        write(&dir, "3.md", &post_file("Fine", "2024-01-01"));
        fs::write(dir.path().join("4.md"), [0xff, 0xfe, 0x00]).unwrap();

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.errors.len(), 3);
        assert_eq!(
            report.errors[0].reason(),
            Some(&MalformedReason::MissingDelimiter)
        );
        assert_eq!(
            report.errors[1].reason(),
            Some(&MalformedReason::InvalidDate("nope".to_string()))
        );
        assert!(matches!(report.errors[2], PostError::Read { .. }));
    }

    #[test]
    fn test_non_markdown_and_nested_files_ignored() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes.txt", "not a post");
        write(&dir, "post.markdown", &post_file("Long Ext", "2024-01-01"));
        fs::create_dir(dir.path().join("drafts")).unwrap();
        fs::write(
            dir.path().join("drafts").join("draft.md"),
            post_file("Draft", "2024-01-01"),
        )
        .unwrap();

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.posts[0].slug, "long-ext");
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = PostLoader::new()
            .load(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, LoadError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_file_instead_of_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("A", "2024-01-01"));
        let err = PostLoader::new().load(&dir.path().join("a.md")).unwrap_err();
        assert!(matches!(err, LoadError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_reload_is_deterministic() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("Same Day B", "2024-01-01"));
        write(&dir, "b.md", &post_file("Same Day A", "2024-01-01"));

        let loader = PostLoader::new();
        let first = loader.load(dir.path()).unwrap();
        let second = loader.load(dir.path()).unwrap();
        let slugs = |r: &LoadReport| r.posts.iter().map(|p| p.slug.clone()).collect::<Vec<_>>();
        assert_eq!(slugs(&first), vec!["same-day-a", "same-day-b"]);
        assert_eq!(slugs(&first), slugs(&second));
    }

    #[test]
    fn test_derived_fields() {
        let words = vec!["word"; 1000].join(" ");
        let content = format!(
            "---\ntitle: Long Read\ndate: 2024-01-01\ndescription: d\n---\n\n{}\n",
            words
        );
        let post = PostLoader::new()
            .parse_post(&content, Path::new("long.md"))
            .unwrap();
        assert_eq!(post.reading_time, 5);
        assert_eq!(post.word_count, 1000);
        assert!(post.excerpt.ends_with("..."));
        assert!(post.excerpt.chars().count() <= DEFAULT_EXCERPT_LENGTH + 3);
        assert!(post.content.starts_with("<p>word word"));
    }

    #[test]
    fn test_frontmatter_excerpt_wins() {
        let content =
            "---\ntitle: T\ndate: 2024-01-01\ndescription: d\nexcerpt: Hand written\n---\nBody text\n";
        let post = PostLoader::new()
            .parse_post(content, Path::new("t.md"))
            .unwrap();
        assert_eq!(post.excerpt, "Hand written");
    }

    #[test]
    fn test_custom_options() {
        let content = "---\ntitle: T\ndate: 2024-01-01\ndescription: d\n---\none two three four\n";
        let post = PostLoader::with_options(9, 2)
            .parse_post(content, Path::new("t.md"))
            .unwrap();
        assert_eq!(post.excerpt, "one two...");
        assert_eq!(post.reading_time, 2);
    }

    #[test]
    fn test_tag_counts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.md", &post_file("A", "2024-01-01"));
        write(
            &dir,
            "b.md",
            "---\ntitle: B\ndate: 2024-01-02\ndescription: d\ntags: [\"web\", \"rust\"]\n---\n",
        );

        let report = PostLoader::new().load(dir.path()).unwrap();
        assert_eq!(
            report.tags(),
            vec![("rust".to_string(), 2), ("web".to_string(), 1)]
        );
        assert_eq!(report.find("b").unwrap().tags, vec!["web", "rust"]);
    }
}
