//! Errors raised while loading posts

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal error for a whole load pass
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("posts directory {path:?} is not readable: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure isolated to a single post file
#[derive(Debug, Error)]
pub enum PostError {
    #[error("malformed post {path:?}: {reason}")]
    Malformed {
        path: PathBuf,
        reason: MalformedReason,
    },

    #[error("failed to render markdown in {path:?}")]
    MarkdownRender { path: PathBuf },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PostError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: MalformedReason) -> Self {
        PostError::Malformed {
            path: path.into(),
            reason,
        }
    }

    /// The file this error belongs to
    pub fn path(&self) -> &std::path::Path {
        match self {
            PostError::Malformed { path, .. }
            | PostError::MarkdownRender { path }
            | PostError::Read { path, .. } => path,
        }
    }

    /// The malformation reason, if this is a `Malformed` error
    pub fn reason(&self) -> Option<&MalformedReason> {
        match self {
            PostError::Malformed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Why a post file was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The opening or closing `---` line is absent
    MissingDelimiter,
    /// A required frontmatter key is absent or blank
    MissingRequiredField(&'static str),
    /// The `date` value is not a calendar date
    InvalidDate(String),
    /// Another post already claimed this slug
    DuplicateSlug(String),
    /// The frontmatter block is not a valid flat YAML mapping
    InvalidFrontMatter(String),
    /// `tags` is not a list of non-empty strings
    InvalidTags(String),
    /// The title contains nothing a slug can be made from
    EmptySlug,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingDelimiter => {
                f.write_str("missing `---` frontmatter delimiter")
            }
            MalformedReason::MissingRequiredField(name) => {
                write!(f, "missing required field `{}`", name)
            }
            MalformedReason::InvalidDate(value) => write!(f, "invalid date {:?}", value),
            MalformedReason::DuplicateSlug(slug) => {
                write!(f, "slug {:?} is already used by another post", slug)
            }
            MalformedReason::InvalidFrontMatter(msg) => write!(f, "invalid frontmatter: {}", msg),
            MalformedReason::InvalidTags(msg) => write!(f, "invalid tags: {}", msg),
            MalformedReason::EmptySlug => f.write_str("title produces an empty slug"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_file_and_field() {
        let err = PostError::malformed(
            "posts/a.md",
            MalformedReason::MissingRequiredField("date"),
        );
        let msg = err.to_string();
        assert!(msg.contains("posts/a.md"));
        assert!(msg.contains("`date`"));
        assert_eq!(
            err.reason(),
            Some(&MalformedReason::MissingRequiredField("date"))
        );
    }
}
