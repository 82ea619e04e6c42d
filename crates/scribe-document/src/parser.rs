//! HTML fragment to document parser.
//!
//! The fragment is parsed with an HTML5-compliant parser (so unclosed and
//! malformed markup is repaired the way a browser would), then walked top-level
//! node by top-level node. Conversion never fails: a node that cannot be
//! converted is downgraded to a plain paragraph of its text content.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::sync::LazyLock;

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::detect::detect;
use crate::error::NodeError;
use crate::model::{
    Alignment, Block, CodeBlock, Document, Heading, Image, List, ListItem, Paragraph, Table,
    TableCell, TableRow, Text, TextFormat,
};

/// Matches an opening tag as name, attribute run and closing slash. Quoted
/// attribute values may contain `>`.
static OPEN_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<([A-Za-z][^\s/>]*)((?:\s+[^\s=/>]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?)*)(\s*/?)>"#,
    )
    .expect("invalid open tag regex")
});

/// Matches one whole attribute, capturing its name.
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+([^\s=/>]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?"#)
        .expect("invalid attribute regex")
});

/// Parse an HTML fragment into a document.
///
/// Shorthand for [`HtmlParser::parse`].
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}

/// Remove every inline `style` attribute from the markup.
///
/// Styling is regenerated by the serializer and never trusted from input.
pub fn strip_style_attributes(html: &str) -> String {
    OPEN_TAG_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            let attributes = ATTRIBUTE_PATTERN.replace_all(&caps[2], |attr: &regex::Captures| {
                if attr[1].eq_ignore_ascii_case("style") {
                    String::new()
                } else {
                    attr[0].to_owned()
                }
            });
            format!("<{}{attributes}{}>", &caps[1], &caps[3])
        })
        .into_owned()
}

/// HTML to [`Document`] parser.
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML fragment.
    ///
    /// Empty or whitespace-only input yields one paragraph with no inline
    /// children, never an empty document.
    pub fn parse(&self, html: &str) -> Document {
        let html = strip_style_attributes(html);
        if html.trim().is_empty() {
            return Document::new(vec![Block::Paragraph(Paragraph::default())]);
        }

        let fragment = Html::parse_fragment(&html);
        let root = fragment.root_element();
        let mut blocks = Vec::new();

        for child in root.children() {
            match child.value() {
                Node::Text(text) => {
                    let content: &str = text;
                    if !content.trim().is_empty() {
                        blocks.push(Block::Paragraph(Paragraph::plain(content)));
                    }
                }
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        self.parse_top_level(element, &mut blocks);
                    }
                }
                _ => {}
            }
        }

        if blocks.is_empty() {
            blocks.push(Block::Paragraph(Paragraph::default()));
        }

        Document::new(blocks)
    }

    /// Convert one top-level element, falling back to its text on failure.
    fn parse_top_level(&self, element: ElementRef<'_>, out: &mut Vec<Block>) {
        match self.parse_block(element) {
            Ok(Some(block)) => out.push(block),
            Ok(None) => {}
            Err(err) => {
                debug!(
                    tag = element.value().name(),
                    error = %err,
                    "Falling back to plain paragraph"
                );
                out.push(Block::Paragraph(Paragraph::plain(element_text(element))));
            }
        }
    }

    fn parse_block(&self, element: ElementRef<'_>) -> Result<Option<Block>, NodeError> {
        let name = element.value().name();
        match name {
            "p" => Ok(self.parse_paragraph(element)),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.parse_heading(element),
            "blockquote" => {
                let children = self.collect_inline(element);
                Ok((!children.is_empty()).then(|| {
                    Block::Quote(Paragraph::new(children).with_align(alignment_of(element)))
                }))
            }
            "code" | "pre" => Ok(Some(Block::Code(self.parse_code(element)))),
            "table" => self.parse_table(element).map(|t| Some(Block::Table(t))),
            "ul" | "ol" => Ok(Some(Block::List(self.parse_list(element)))),
            "img" => self.parse_image(element).map(|i| Some(Block::Image(i))),
            "figure" => match first_descendant(element, "img") {
                Some(img) => {
                    let mut image = self.parse_image(img)?;
                    image.caption = first_descendant(element, "figcaption")
                        .map(element_text)
                        .filter(|caption| !caption.trim().is_empty());
                    Ok(Some(Block::Image(image)))
                }
                None => Ok(Some(self.parse_other(element))),
            },
            "br" => Ok(Some(Block::Paragraph(Paragraph::default()))),
            _ => Ok(Some(self.parse_other(element))),
        }
    }

    fn parse_paragraph(&self, element: ElementRef<'_>) -> Option<Block> {
        if let Some(img) = sole_image(element)
            && let Ok(image) = self.parse_image(img)
        {
            return Some(Block::Image(image));
        }

        let children = self.collect_inline(element);
        if children.is_empty() {
            return None;
        }
        Some(Block::Paragraph(
            Paragraph::new(children).with_align(alignment_of(element)),
        ))
    }

    fn parse_heading(&self, element: ElementRef<'_>) -> Result<Option<Block>, NodeError> {
        let name = element.value().name();
        let level = name
            .strip_prefix('h')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|level| (1..=6).contains(level))
            .ok_or_else(|| NodeError::InvalidHeadingLevel(name.to_owned()))?;

        let children = self.collect_inline(element);
        if children.is_empty() {
            return Ok(None);
        }
        let mut heading = Heading::new(level, children);
        heading.align = alignment_of(element);
        Ok(Some(Block::Heading(heading)))
    }

    /// Parse a code block from `<code>` or a `<pre>` wrapper.
    fn parse_code(&self, element: ElementRef<'_>) -> CodeBlock {
        let code = if element.value().name() == "pre" {
            child_elements(element)
                .find(|child| child.value().name() == "code")
                .unwrap_or(element)
        } else {
            element
        };

        let text = if is_rich_editor_code(code) {
            rich_editor_code_text(code)
        } else {
            plain_code_text(code)
        };

        let language = explicit_language(code)
            .or_else(|| explicit_language(element))
            .unwrap_or_else(|| detect(&text).to_owned());

        CodeBlock::new(text, Some(language))
    }

    fn parse_table(&self, table: ElementRef<'_>) -> Result<Table, NodeError> {
        let rows: Vec<TableRow> = table_rows(table)
            .into_iter()
            .map(|row| self.parse_row(row))
            .collect();
        if rows.is_empty() {
            return Err(NodeError::EmptyTable);
        }
        Ok(Table { rows })
    }

    fn parse_row(&self, row: ElementRef<'_>) -> TableRow {
        let cells: Vec<TableCell> = child_elements(row)
            .filter(|cell| matches!(cell.value().name(), "td" | "th"))
            .map(|cell| self.parse_cell(cell))
            .collect();

        if cells.is_empty() {
            // Malformed row: keep its text as a single cell rather than drop it.
            let text = element_text(row);
            if !text.trim().is_empty() {
                return TableRow {
                    cells: vec![TableCell::new(false, Paragraph::plain(text))],
                };
            }
        }
        TableRow { cells }
    }

    fn parse_cell(&self, cell: ElementRef<'_>) -> TableCell {
        let header = cell.value().name() == "th";
        let mut children = self.collect_inline(cell);
        if children.is_empty() {
            children.push(Text::plain(element_text(cell)));
        }
        TableCell::new(header, Paragraph::new(children))
    }

    fn parse_list(&self, list: ElementRef<'_>) -> List {
        let ordered = list.value().name() == "ol";
        let mut items = Vec::new();

        for child in child_elements(list) {
            if child.value().name() == "li" {
                items.push(self.parse_list_item(child));
            } else if !element_text(child).trim().is_empty() {
                // Stray non-<li> content becomes its own item.
                items.push(ListItem::new(Paragraph::new(self.inline_run(child))));
            }
        }

        List { ordered, items }
    }

    /// Split an item's children into its own inline run and nested lists.
    fn parse_list_item(&self, item: ElementRef<'_>) -> ListItem {
        let mut inlines = Vec::new();
        let mut children = Vec::new();

        for child in item.children() {
            if let Some(element) = ElementRef::wrap(child)
                && matches!(element.value().name(), "ul" | "ol")
            {
                children.push(self.parse_list(element));
                continue;
            }
            self.collect_node(child, TextFormat::PLAIN, &mut inlines);
        }

        ListItem {
            content: Paragraph::new(with_placeholder(inlines)),
            children,
        }
    }

    fn parse_image(&self, img: ElementRef<'_>) -> Result<Image, NodeError> {
        let attrs = img.value();
        let src = attrs
            .attr("src")
            .filter(|src| !src.trim().is_empty())
            .ok_or(NodeError::MissingImageSource)?;

        Ok(Image {
            src: src.to_owned(),
            alt: attrs.attr("alt").unwrap_or_default().to_owned(),
            width: attrs.attr("width").and_then(parse_dimension),
            height: attrs.attr("height").and_then(parse_dimension),
            caption: None,
        })
    }

    /// Unknown block-level tag: keep structured markup verbatim, flatten text.
    fn parse_other(&self, element: ElementRef<'_>) -> Block {
        let has_child_elements = element.children().any(|child| child.value().is_element());
        let text = element_text(element);

        if has_child_elements || text.is_empty() {
            Block::Paragraph(Paragraph::new(vec![Text::plain(element.html())]))
        } else {
            Block::Paragraph(Paragraph::plain(text))
        }
    }

    /// Inline run with the empty-text placeholder guarantee.
    fn inline_run(&self, element: ElementRef<'_>) -> Vec<Text> {
        with_placeholder(self.collect_inline(element))
    }

    /// Inline run without placeholder; empty when nothing was recovered.
    fn collect_inline(&self, element: ElementRef<'_>) -> Vec<Text> {
        let mut out = Vec::new();
        self.collect_children(element, TextFormat::PLAIN, &mut out);
        out
    }

    fn collect_children(&self, element: ElementRef<'_>, format: TextFormat, out: &mut Vec<Text>) {
        for child in element.children() {
            self.collect_node(child, format, out);
        }
    }

    /// Depth-first walk accumulating the formatting bitmask.
    fn collect_node(
        &self,
        node: ego_tree::NodeRef<'_, Node>,
        format: TextFormat,
        out: &mut Vec<Text>,
    ) {
        match node.value() {
            Node::Text(text) => {
                let content: &str = text;
                if !content.is_empty() {
                    out.push(Text::new(content, format));
                }
            }
            Node::Element(_) => {
                let Some(element) = ElementRef::wrap(node) else {
                    return;
                };
                match element.value().name() {
                    "strong" | "b" => self.collect_children(element, format | TextFormat::BOLD, out),
                    "em" | "i" => self.collect_children(element, format | TextFormat::ITALIC, out),
                    "u" | "ins" => {
                        self.collect_children(element, format | TextFormat::UNDERLINE, out);
                    }
                    "s" | "strike" | "del" => {
                        self.collect_children(element, format | TextFormat::STRIKETHROUGH, out);
                    }
                    "br" => out.push(Text::new("\n", format)),
                    "code" => {
                        let text = element_text(element);
                        if !text.is_empty() {
                            out.push(Text::new(text, format));
                        }
                    }
                    "span" | "font" | "label" => self.collect_children(element, format, out),
                    "p" | "div" => {
                        if !out.is_empty() {
                            out.push(Text::new("\n", format));
                        }
                        self.collect_children(element, format, out);
                    }
                    _ => out.push(Text::new(element.html(), format)),
                }
            }
            _ => {}
        }
    }
}

/// Append the empty-text placeholder when a run came out empty.
fn with_placeholder(mut inlines: Vec<Text>) -> Vec<Text> {
    if inlines.is_empty() {
        inlines.push(Text::default());
    }
    inlines
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn first_descendant<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|descendant| descendant.value().name() == name)
}

/// `<tr>` elements directly under the table or under `thead`/`tbody`/`tfoot`.
fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(child).filter(|row| row.value().name() == "tr"));
            }
            _ => {}
        }
    }
    rows
}

/// `<p>` whose only meaningful content is one `<img>`.
fn sole_image(paragraph: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut image = None;
    for child in paragraph.children() {
        match child.value() {
            Node::Text(text) => {
                let content: &str = text;
                if !content.trim().is_empty() {
                    return None;
                }
            }
            Node::Element(element) => {
                if element.name() != "img" || image.is_some() {
                    return None;
                }
                image = ElementRef::wrap(child);
            }
            _ => {}
        }
    }
    image
}

fn alignment_of(element: ElementRef<'_>) -> Alignment {
    element
        .value()
        .attr("align")
        .and_then(Alignment::parse)
        .unwrap_or_default()
}

/// Language from `data-language`, or a `language-*` class.
fn explicit_language(element: ElementRef<'_>) -> Option<String> {
    let attrs = element.value();
    if let Some(lang) = attrs.attr("data-language").map(str::trim)
        && !lang.is_empty()
    {
        return Some(lang.to_owned());
    }
    attrs
        .classes()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
}

/// Rich-editor code: text-bearing `<span>`s interleaved with `<br>`.
fn is_rich_editor_code(code: ElementRef<'_>) -> bool {
    child_elements(code).any(|child| {
        child.value().name() == "span" && child.value().attr("data-lexical-text") == Some("true")
    })
}

fn rich_editor_code_text(code: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in child_elements(code) {
        match child.value().name() {
            "span" if child.value().attr("data-lexical-text") == Some("true") => {
                text.push_str(&element_text(child));
            }
            "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Plain code: decoded text of every descendant, with `<br>` as a newline.
fn plain_code_text(code: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in code.descendants().skip(1) {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(element) if element.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Parse `width`/`height` values such as `640` or `640px`.
fn parse_dimension(value: &str) -> Option<u32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<u32>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn blocks(html: &str) -> Vec<Block> {
        parse(html).blocks
    }

    #[test]
    fn test_empty_input_yields_single_empty_paragraph() {
        assert_eq!(blocks(""), vec![Block::Paragraph(Paragraph::default())]);
        assert_eq!(blocks("  \n\t "), vec![Block::Paragraph(Paragraph::default())]);
    }

    #[test]
    fn test_strip_style_attributes() {
        assert_eq!(
            strip_style_attributes(r#"<p style="color: red" class="x">style="kept"</p>"#),
            r#"<p class="x">style="kept"</p>"#
        );
        assert_eq!(
            strip_style_attributes("<td STYLE='a:b'>x</td>"),
            "<td>x</td>"
        );
    }

    #[test]
    fn test_strip_style_respects_attribute_boundaries() {
        assert_eq!(
            strip_style_attributes(r#"<img alt="a style=b" src=x.png>"#),
            r#"<img alt="a style=b" src=x.png>"#
        );
        assert_eq!(
            strip_style_attributes(r#"<img alt="a > b" style="c" src="x.png"/>"#),
            r#"<img alt="a > b" src="x.png"/>"#
        );
        assert_eq!(
            strip_style_attributes("<p data-style=x style = 'y'>z</p>"),
            "<p data-style=x>z</p>"
        );
    }

    #[test]
    fn test_alt_text_containing_style_survives_parse() {
        assert_eq!(
            blocks(r#"<img alt="a style=b" src="x.png">"#),
            vec![Block::Image(Image::new("x.png", "a style=b"))]
        );
    }

    #[test]
    fn test_paragraph_formatting_bits() {
        let result = blocks("<p>a<strong>b<em>c</em></strong><u>d</u><s>e</s></p>");
        assert_eq!(
            result,
            vec![Block::Paragraph(Paragraph::new(vec![
                Text::plain("a"),
                Text::new("b", TextFormat::BOLD),
                Text::new("c", TextFormat::BOLD | TextFormat::ITALIC),
                Text::new("d", TextFormat::UNDERLINE),
                Text::new("e", TextFormat::STRIKETHROUGH),
            ]))]
        );
    }

    #[test]
    fn test_empty_paragraph_is_dropped() {
        assert_eq!(
            blocks("<p></p><p>x</p>"),
            vec![Block::Paragraph(Paragraph::plain("x"))]
        );
    }

    #[test]
    fn test_whitespace_is_preserved() {
        assert_eq!(
            blocks("<p><b>a</b> <i>b</i></p>"),
            vec![Block::Paragraph(Paragraph::new(vec![
                Text::new("a", TextFormat::BOLD),
                Text::plain(" "),
                Text::new("b", TextFormat::ITALIC),
            ]))]
        );
    }

    #[test]
    fn test_br_inside_paragraph_is_newline() {
        assert_eq!(
            blocks("<p>a<br>b</p>"),
            vec![Block::Paragraph(Paragraph::new(vec![
                Text::plain("a"),
                Text::plain("\n"),
                Text::plain("b"),
            ]))]
        );
    }

    #[test]
    fn test_block_level_br_is_empty_paragraph() {
        assert_eq!(blocks("<br>"), vec![Block::Paragraph(Paragraph::default())]);
    }

    #[test]
    fn test_inline_code_is_verbatim() {
        assert_eq!(
            blocks("<p><b>run <code>x<i>y</i></code></b></p>"),
            vec![Block::Paragraph(Paragraph::new(vec![
                Text::new("run ", TextFormat::BOLD),
                Text::new("xy", TextFormat::BOLD),
            ]))]
        );
    }

    #[test]
    fn test_heading_levels_and_alignment() {
        assert_eq!(
            blocks(r#"<h3 align="center">Title</h3>"#),
            vec![Block::Heading(Heading {
                level: 3,
                children: vec![Text::plain("Title")],
                align: Alignment::Center,
            })]
        );
    }

    #[test]
    fn test_blockquote_with_nested_paragraphs() {
        assert_eq!(
            blocks("<blockquote><p>a</p><p>b</p></blockquote>"),
            vec![Block::Quote(Paragraph::new(vec![
                Text::plain("a"),
                Text::plain("\n"),
                Text::plain("b"),
            ]))]
        );
    }

    #[test]
    fn test_code_block_with_language_attribute() {
        assert_eq!(
            blocks("<code data-language=\"rust\">fn main() {\n    a &lt; b\n}</code>"),
            vec![Block::Code(CodeBlock::new(
                "fn main() {\n    a < b\n}",
                Some("rust".to_owned())
            ))]
        );
    }

    #[test]
    fn test_plain_code_recovers_text_from_nested_markup() {
        assert_eq!(
            blocks(r#"<code data-language="c"><b>a &lt; b</b><br><span>c;</span></code>"#),
            vec![Block::Code(CodeBlock::new("a < b\nc;", Some("c".to_owned())))]
        );
    }

    #[test]
    fn test_code_block_rich_editor_shape() {
        let html = concat!(
            r#"<code data-language="javascript">"#,
            r#"<span data-lexical-text="true">const a = 1;</span><br>"#,
            r#"<span data-lexical-text="true">a &amp;&amp; b</span>"#,
            "</code>"
        );
        assert_eq!(
            blocks(html),
            vec![Block::Code(CodeBlock::new(
                "const a = 1;\na && b",
                Some("javascript".to_owned())
            ))]
        );
    }

    #[test]
    fn test_code_block_detects_language() {
        assert_eq!(
            blocks("<code>def f():\n    pass</code>"),
            vec![Block::Code(CodeBlock::new(
                "def f():\n    pass",
                Some("python".to_owned())
            ))]
        );
    }

    #[test]
    fn test_pre_code_with_language_class() {
        assert_eq!(
            blocks(r#"<pre><code class="language-sql">SELECT 1</code></pre>"#),
            vec![Block::Code(CodeBlock::new("SELECT 1", Some("sql".to_owned())))]
        );
    }

    #[test]
    fn test_nested_list_is_separated() {
        let result = blocks("<ul><li>A<ul><li>B</li></ul></li></ul>");
        assert_eq!(
            result,
            vec![Block::List(List {
                ordered: false,
                items: vec![ListItem::new(Paragraph::plain("A")).with_child(List {
                    ordered: false,
                    items: vec![ListItem::new(Paragraph::plain("B"))],
                })],
            })]
        );
    }

    #[test]
    fn test_ordered_list_items() {
        let result = blocks("<ol><li><b>one</b></li><li></li></ol>");
        assert_eq!(
            result,
            vec![Block::List(List {
                ordered: true,
                items: vec![
                    ListItem::new(Paragraph::new(vec![Text::new("one", TextFormat::BOLD)])),
                    ListItem::new(Paragraph::new(vec![Text::default()])),
                ],
            })]
        );
    }

    #[test]
    fn test_table_with_header_and_tbody() {
        let result = blocks(
            "<table><thead><tr><th>H1</th><th>H2</th></tr></thead>\
             <tbody><tr><td>a</td><td><b>b</b></td></tr></tbody></table>",
        );
        assert_eq!(
            result,
            vec![Block::Table(Table {
                rows: vec![
                    TableRow {
                        cells: vec![
                            TableCell::new(true, Paragraph::plain("H1")),
                            TableCell::new(true, Paragraph::plain("H2")),
                        ],
                    },
                    TableRow {
                        cells: vec![
                            TableCell::new(false, Paragraph::plain("a")),
                            TableCell::new(
                                false,
                                Paragraph::new(vec![Text::new("b", TextFormat::BOLD)])
                            ),
                        ],
                    },
                ],
            })]
        );
    }

    #[test]
    fn test_ragged_table() {
        let result = blocks("<table><tr><td>a</td></tr><tr><td>b</td><td>c</td></tr></table>");
        let Block::Table(table) = &result[0] else {
            panic!("expected table, got {result:?}");
        };
        assert_eq!(table.rows[0].cells.len(), 1);
        assert_eq!(table.rows[1].cells.len(), 2);
    }

    #[test]
    fn test_table_without_rows_falls_back_to_text() {
        assert_eq!(
            blocks("<table></table>"),
            vec![Block::Paragraph(Paragraph::plain(""))]
        );
    }

    #[test]
    fn test_image_attributes() {
        assert_eq!(
            blocks(r#"<img src="a.png" alt="A" width="640px" height="auto">"#),
            vec![Block::Image(Image {
                src: "a.png".to_owned(),
                alt: "A".to_owned(),
                width: Some(640),
                height: None,
                caption: None,
            })]
        );
    }

    #[test]
    fn test_image_without_src_falls_back() {
        assert_eq!(
            blocks(r#"<img alt="x">"#),
            vec![Block::Paragraph(Paragraph::plain(""))]
        );
    }

    #[test]
    fn test_figure_with_caption() {
        assert_eq!(
            blocks(r#"<figure><img src="a.png"><figcaption>Cap</figcaption></figure>"#),
            vec![Block::Image(Image {
                src: "a.png".to_owned(),
                caption: Some("Cap".to_owned()),
                ..Image::default()
            })]
        );
    }

    #[test]
    fn test_paragraph_with_only_image_becomes_image() {
        assert_eq!(
            blocks(r#"<p> <img src="a.png"> </p>"#),
            vec![Block::Image(Image::new("a.png", ""))]
        );
    }

    #[test]
    fn test_inline_link_is_passthrough() {
        let result = blocks(r#"<p>see <a href="/x">here</a></p>"#);
        assert_eq!(
            result,
            vec![Block::Paragraph(Paragraph::new(vec![
                Text::plain("see "),
                Text::plain(r#"<a href="/x">here</a>"#),
            ]))]
        );
    }

    #[test]
    fn test_unknown_tag_with_children_is_passthrough() {
        assert_eq!(
            blocks("<section><p>x</p></section>"),
            vec![Block::Paragraph(Paragraph::plain("<section><p>x</p></section>"))]
        );
    }

    #[test]
    fn test_unknown_tag_with_text_is_paragraph() {
        assert_eq!(
            blocks("<div>hello</div>"),
            vec![Block::Paragraph(Paragraph::plain("hello"))]
        );
    }

    #[test]
    fn test_bare_text_is_paragraph() {
        assert_eq!(
            blocks("hello\n<p>x</p>\n"),
            vec![
                Block::Paragraph(Paragraph::plain("hello\n")),
                Block::Paragraph(Paragraph::plain("x")),
            ]
        );
    }

    #[test]
    fn test_style_attributes_are_ignored() {
        assert_eq!(
            blocks(r#"<p style="font-size: 20px"><b style="color:red">x</b></p>"#),
            vec![Block::Paragraph(Paragraph::new(vec![Text::new(
                "x",
                TextFormat::BOLD
            )]))]
        );
    }
}
