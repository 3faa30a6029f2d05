//! Markdown rendering

use std::fmt;

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// Output of rendering one markdown body
#[derive(Debug, Clone, Default)]
pub struct RenderedBody {
    /// HTML for the body
    pub html: String,
    /// Plain text of the prose, code blocks left out
    pub text: String,
    /// Words in the prose plus words inside code blocks
    pub word_count: usize,
}

/// CommonMark renderer with the GitHub table/strikethrough extensions
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        // Smart punctuation stays off so rendered text matches the source
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        Self { options }
    }

    /// Render markdown to HTML, collecting the plain text along the way.
    ///
    /// Fenced code keeps its info string as `class="language-..."`. Raw HTML
    /// is passed through untouched.
    pub fn render(&self, markdown: &str) -> Result<RenderedBody, fmt::Error> {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut text = String::new();
        let mut code_words = 0;
        let mut in_code_block = false;

        for event in parser {
            match &event {
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::Start(Tag::Item) => text.push(' '),
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    text.push(' ');
                }
                Event::End(end) if ends_text_block(end) => text.push(' '),
                Event::Text(t) | Event::Code(t) => {
                    if in_code_block {
                        code_words += t.split_whitespace().count();
                    } else {
                        text.push_str(t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                _ => {}
            }
            events.push(event);
        }

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::write_html_fmt(&mut html_output, events.into_iter())?;

        let text = normalize_whitespace(&text);
        let word_count = text.split_whitespace().count() + code_words;

        Ok(RenderedBody {
            html: html_output,
            text,
            word_count,
        })
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn ends_text_block(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::TableCell
            | TagEnd::FootnoteDefinition
    )
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
