//! Document to HTML serialization.
//!
//! One tree walk, two variants:
//!
//! - [`StyledBackend`]: inline `style` attributes from a fixed visual theme,
//!   for contexts where no stylesheet is available (emails, previews).
//! - [`CleanBackend`]: minimal semantic markup. Parsing clean output
//!   reconstructs an equivalent document.

#![deny(clippy::wildcard_enum_match_arm)]
#![allow(clippy::unused_self)] // Walk methods take &self for API consistency

mod backend;
mod clean;
mod styled;

use std::fmt::Write;
use std::marker::PhantomData;
use std::sync::LazyLock;

use regex::Regex;

pub use backend::SerializeBackend;
pub use clean::CleanBackend;
pub use styled::StyledBackend;

use crate::model::{Block, CodeBlock, Document, Image, List, Paragraph, Table, Text, TextFormat};

/// Tags whose complete element is never wrapped in `<p>`.
const BLOCK_LIKE_TAGS: &[&str] = &[
    "img", "div", "section", "article", "aside", "header", "footer", "nav", "iframe", "video",
    "audio", "canvas", "svg", "table", "form", "input", "button", "select", "textarea", "hr", "br",
];

/// Block-like tags that have no closing tag.
const VOID_TAGS: &[&str] = &["img", "input", "hr", "br"];

/// Captures the name of a leading opening tag.
static LEADING_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9]*)[\s/>]").expect("invalid leading tag regex"));

/// Serialize with the styled theme.
pub fn to_styled_html(document: &Document) -> String {
    HtmlSerializer::<StyledBackend>::new().serialize(document)
}

/// Serialize as clean semantic HTML.
pub fn to_clean_html(document: &Document) -> String {
    HtmlSerializer::<CleanBackend>::new().serialize(document)
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Tree walk shared by both variants.
pub struct HtmlSerializer<B: SerializeBackend> {
    _backend: PhantomData<B>,
}

impl<B: SerializeBackend> Default for HtmlSerializer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SerializeBackend> HtmlSerializer<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            _backend: PhantomData,
        }
    }

    /// Serialize a document. Top-level blocks are separated by newlines.
    pub fn serialize(&self, document: &Document) -> String {
        let mut out = String::new();
        for (i, block) in document.blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.block(block, &mut out);
        }
        out
    }

    fn block(&self, block: &Block, out: &mut String) {
        match block {
            Block::Paragraph(paragraph) => self.paragraph(paragraph, out),
            Block::Heading(heading) => {
                let level = heading.level.clamp(1, 6);
                B::heading_start(level, heading.align, out);
                self.inline_or_break(&heading.children, out);
                write!(out, "</h{level}>").unwrap();
            }
            Block::Quote(quote) => {
                B::blockquote_start(quote.align, out);
                self.inline_or_break(&quote.children, out);
                out.push_str("</blockquote>");
            }
            Block::Code(code) => self.code_block(code, out),
            Block::List(list) => self.list(list, 0, out),
            Block::Table(table) => self.table(table, out),
            Block::Image(image) => self.image(image, out),
        }
    }

    fn paragraph(&self, paragraph: &Paragraph, out: &mut String) {
        let mut inline = String::new();
        self.inline(&paragraph.children, &mut inline);

        // Only pre-formed markup may stand in for its paragraph.
        let passthrough = paragraph.children.iter().any(Text::is_passthrough);
        if passthrough && is_block_like_element(&inline) {
            out.push_str(inline.trim());
            return;
        }

        B::paragraph_start(paragraph.align, out);
        if is_blank(&paragraph.children) {
            out.push_str("<br>");
        } else {
            out.push_str(&inline);
        }
        out.push_str("</p>");
    }

    fn code_block(&self, code: &CodeBlock, out: &mut String) {
        let lang = escape_html(&code.resolved_language());
        B::code_start(&lang, out);
        let escaped = escape_html(&code.code);
        if B::CODE_LINE_BREAKS {
            out.push_str(&escaped.replace('\n', "<br>"));
        } else {
            out.push_str(&escaped);
        }
        out.push_str("</code>");
    }

    fn list(&self, list: &List, depth: usize, out: &mut String) {
        B::list_start(list.ordered, depth, out);
        for item in &list.items {
            B::list_item_start(out);
            self.inline(&item.content.children, out);
            for nested in &item.children {
                self.list(nested, depth + 1, out);
            }
            out.push_str("</li>");
        }
        out.push_str(if list.ordered { "</ol>" } else { "</ul>" });
    }

    fn table(&self, table: &Table, out: &mut String) {
        B::table_start(out);
        for row in &table.rows {
            B::row_start(out);
            for cell in &row.cells {
                B::cell_start(cell.header, out);
                self.inline(&cell.content.children, out);
                out.push_str(if cell.header { "</th>" } else { "</td>" });
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
    }

    fn image(&self, image: &Image, out: &mut String) {
        match image.caption.as_deref() {
            Some(caption) => {
                B::figure_start(out);
                B::image(image, out);
                B::figcaption_start(out);
                out.push_str(&escape_html(caption));
                out.push_str("</figcaption></figure>");
            }
            None => B::image(image, out),
        }
    }

    /// Inline run for blocks that must keep at least a line box.
    fn inline_or_break(&self, children: &[Text], out: &mut String) {
        if is_blank(children) {
            out.push_str("<br>");
        } else {
            self.inline(children, out);
        }
    }

    fn inline(&self, children: &[Text], out: &mut String) {
        for text in children {
            self.text(text, out);
        }
    }

    fn text(&self, text: &Text, out: &mut String) {
        if text.is_passthrough() {
            out.push_str(&text.text);
            return;
        }

        let body = escape_html(&text.text).replace('\n', "<br>");
        let wrappers = [
            (TextFormat::BOLD, "strong"),
            (TextFormat::ITALIC, "em"),
            (TextFormat::STRIKETHROUGH, "s"),
            (TextFormat::UNDERLINE, "u"),
        ];
        let active: Vec<&str> = wrappers
            .iter()
            .filter(|(bit, _)| text.format.contains(*bit))
            .map(|(_, tag)| *tag)
            .collect();

        for tag in &active {
            write!(out, "<{tag}>").unwrap();
        }
        out.push_str(&body);
        for tag in active.iter().rev() {
            write!(out, "</{tag}>").unwrap();
        }
    }
}

/// Shared `src`/`alt`/`width`/`height` attributes for `<img>`.
pub(crate) fn image_attributes(image: &Image, out: &mut String) {
    write!(out, r#" src="{}""#, escape_html(&image.src)).unwrap();
    if !image.alt.is_empty() {
        write!(out, r#" alt="{}""#, escape_html(&image.alt)).unwrap();
    }
    if let Some(width) = image.width {
        write!(out, r#" width="{width}""#).unwrap();
    }
    if let Some(height) = image.height {
        write!(out, r#" height="{height}""#).unwrap();
    }
}

fn is_blank(children: &[Text]) -> bool {
    children.iter().all(|text| text.text.is_empty())
}

/// Whether `html` is one complete element from [`BLOCK_LIKE_TAGS`].
fn is_block_like_element(html: &str) -> bool {
    let html = html.trim();
    let Some(caps) = LEADING_TAG_PATTERN.captures(html) else {
        return false;
    };
    let tag = caps[1].to_ascii_lowercase();
    if !BLOCK_LIKE_TAGS.contains(&tag.as_str()) {
        return false;
    }

    if VOID_TAGS.contains(&tag.as_str()) {
        // A single tag and nothing else.
        return html.ends_with('>') && html.matches('<').count() == 1;
    }
    html.to_ascii_lowercase().ends_with(&format!("</{tag}>"))
}
