//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::MalformedReason;

const DELIMITER: &str = "---";

/// Keys as they appear in the block, before validation
#[derive(Debug, Default)]
struct RawFrontMatter {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    excerpt: Option<String>,
    /// YAML text of the `tags` value, block-list lines included
    tags: Option<String>,
}

impl RawFrontMatter {
    /// Read the block as flat `key: value` lines.
    ///
    /// Scalar values are the text after the first colon, minus one pair of
    /// surrounding quotes, so `title: Rust: A Guide` keeps its colon and a
    /// `#` is not a comment. Indented or `- ` lines belong to the key above;
    /// they are only allowed under `tags` and unknown keys.
    fn read(block: &str) -> Result<Self, MalformedReason> {
        let mut raw = Self::default();
        let mut seen: Vec<&str> = Vec::new();
        let mut nested: Option<&str> = None;

        for (index, line) in block.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if line.starts_with(char::is_whitespace) || trimmed.starts_with('-') {
                match nested {
                    Some("tags") => {
                        let tags = raw.tags.get_or_insert_with(String::new);
                        tags.push('\n');
                        tags.push_str(line);
                    }
                    Some(_) => {}
                    None => {
                        return Err(MalformedReason::InvalidFrontMatter(format!(
                            "unexpected nested value on line {}",
                            index + 1
                        )))
                    }
                }
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| {
                MalformedReason::InvalidFrontMatter(format!(
                    "expected `key: value` on line {}",
                    index + 1
                ))
            })?;
            let key = key.trim();
            if seen.contains(&key) {
                return Err(MalformedReason::InvalidFrontMatter(format!(
                    "duplicate key `{}`",
                    key
                )));
            }
            seen.push(key);

            nested = None;
            match key {
                "title" => raw.title = Some(unquote(value)),
                "date" => raw.date = Some(unquote(value)),
                "description" => raw.description = Some(unquote(value)),
                "excerpt" => raw.excerpt = Some(unquote(value)),
                "tags" => {
                    raw.tags = Some(value.trim().to_string());
                    nested = Some(key);
                }
                _ => nested = Some(key),
            }
        }

        Ok(raw)
    }
}

/// Validated front-matter of a post
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    /// Date exactly as written in the file
    pub date: String,
    /// `date` parsed; date-only values land on midnight UTC
    pub published: DateTime<Utc>,
    pub description: String,
    pub tags: Vec<String>,
    pub excerpt: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), MalformedReason> {
        let (block, body) = split(content)?;
        let fm = Self::from_block(block)?;
        Ok((fm, body))
    }

    fn from_block(block: &str) -> Result<Self, MalformedReason> {
        let raw = RawFrontMatter::read(block)?;

        let title = required(raw.title, "title")?;
        let date = required(raw.date, "date")?;
        let description = required(raw.description, "description")?;

        let published =
            parse_date_string(&date).ok_or_else(|| MalformedReason::InvalidDate(date.clone()))?;
        let tags = parse_tags(raw.tags)?;
        let excerpt = raw
            .excerpt
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self {
            title,
            date,
            published,
            description,
            tags,
            excerpt,
        })
    }
}

/// Split a file into its front-matter block and body.
///
/// The first non-blank line must be `---`; the block runs up to the next
/// `---` line and the body is everything after it.
pub fn split(content: &str) -> Result<(&str, &str), MalformedReason> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut offset = 0;
    let mut block_start = None;

    for line in content.split_inclusive('\n') {
        let line_end = offset + line.len();
        let trimmed = line.trim_end();

        match block_start {
            None if trimmed == DELIMITER => block_start = Some(line_end),
            None if !trimmed.trim_start().is_empty() => break,
            Some(start) if trimmed == DELIMITER => {
                return Ok((&content[start..offset], &content[line_end..]));
            }
            _ => {}
        }

        offset = line_end;
    }

    Err(MalformedReason::MissingDelimiter)
}

fn required(value: Option<String>, name: &'static str) -> Result<String, MalformedReason> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(MalformedReason::MissingRequiredField(name))
}

/// Strip one pair of matching quotes. Double-quoted values also get their
/// escapes resolved (`\"`, `\\`, `\u00e9`).
fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return serde_json::from_str::<String>(value)
            .unwrap_or_else(|_| value[1..value.len() - 1].to_string());
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].replace("''", "'");
    }
    value.to_string()
}

/// Tags must be a YAML list of non-blank strings. Repeats are dropped,
/// keeping the first occurrence.
fn parse_tags(text: Option<String>) -> Result<Vec<String>, MalformedReason> {
    use serde_yaml::Value;

    // Untrimmed so block-list lines keep their shared indentation
    let value = match text {
        Some(text) if !text.trim().is_empty() => serde_yaml::from_str::<Value>(&text)
            .map_err(|e| MalformedReason::InvalidTags(e.to_string()))?,
        _ => return Ok(Vec::new()),
    };

    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(items) => items,
        _ => {
            return Err(MalformedReason::InvalidTags(
                r#"expected a list such as ["rust", "web"]"#.to_string(),
            ))
        }
    };

    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let tag = match item {
            Value::String(s) => s.trim().to_string(),
            other => {
                return Err(MalformedReason::InvalidTags(format!(
                    "entry {} is not a string: {:?}",
                    i + 1,
                    other
                )))
            }
        };
        if tag.is_empty() {
            return Err(MalformedReason::InvalidTags(format!(
                "entry {} is empty",
                i + 1
            )));
        }
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok(tags)
}

/// Parse an ISO 8601 date or date-time
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
