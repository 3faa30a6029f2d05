//! HTML and XML helper functions

use super::url::full_url_for;
use crate::config::SiteConfig;

/// Generate an anchor tag; `text` is escaped
///
/// # Examples
/// ```ignore
/// link_to("/blog/hello/", "Hello & bye") // -> <a href="/blog/hello/">Hello &amp; bye</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, html_escape(href), html_escape(text))
}

/// Generate a feed link tag for the page head
pub fn feed_tag(config: &SiteConfig) -> String {
    format!(
        r#"<link rel="alternate" href="{}" title="{}" type="application/rss+xml">"#,
        full_url_for(config, "feed.xml"),
        html_escape(&config.title)
    )
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="folio {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Convert root-relative `href`/`src` URLs in HTML content to absolute URLs.
/// Protocol-relative values (`//host/...`) are left alone.
pub fn absolutize_urls(content: &str, base_url: &str) -> String {
    let mut out = content.to_string();
    for attr in ["href=\"", "src=\"", "href='", "src='"] {
        out = absolutize_attr(&out, attr, base_url);
    }
    out
}

fn absolutize_attr(content: &str, attr: &str, base_url: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(pos) = rest.find(attr) {
        let value_start = pos + attr.len();
        out.push_str(&rest[..value_start]);
        rest = &rest[value_start..];
        if rest.starts_with('/') && !rest.starts_with("//") {
            out.push_str(base_url);
        }
    }
    out.push_str(rest);
    out
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}
