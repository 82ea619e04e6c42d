//! Styled HTML backend.
//!
//! Every element carries an inline `style` attribute drawn from the theme
//! constants below, so the output renders consistently without a stylesheet.

use std::fmt::Write;

use super::backend::SerializeBackend;
use super::image_attributes;
use crate::model::{Alignment, Image};

/// Font sizes for `h1`..`h6`.
const HEADING_SIZES: [&str; 6] = ["2rem", "1.5rem", "1.25rem", "1.125rem", "1rem", "0.875rem"];

/// Unordered list markers by nesting depth (cycled).
const UNORDERED_MARKERS: [&str; 3] = ["disc", "circle", "square"];

/// Ordered list markers by nesting depth (cycled).
const ORDERED_MARKERS: [&str; 3] = ["decimal", "lower-alpha", "lower-roman"];

const PARAGRAPH_STYLE: &str = "margin: 0 0 1rem 0; line-height: 1.6;";
const HEADING_STYLE: &str = "margin: 1.5rem 0 0.75rem 0; font-weight: 600; line-height: 1.3;";
const BLOCKQUOTE_STYLE: &str =
    "margin: 1rem 0; padding: 0.5rem 1rem; border-left: 4px solid #d0d7de; color: #57606a;";
const CODE_STYLE: &str = "display: block; margin: 1rem 0; padding: 1rem; \
     font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 0.875rem; \
     line-height: 1.5; background-color: #f6f8fa; border: 1px solid #d0d7de; \
     border-radius: 6px; overflow-x: auto; white-space: pre;";
const LIST_STYLE: &str = "margin: 0.5rem 0; padding-left: 1.5rem;";
const LIST_ITEM_STYLE: &str = "margin: 0.25rem 0;";
const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%; margin: 1rem 0;";
const HEADER_CELL_STYLE: &str = "border: 1px solid #d0d7de; padding: 0.5rem 0.75rem; \
     background-color: #f6f8fa; font-weight: 600; text-align: left;";
const CELL_STYLE: &str = "border: 1px solid #d0d7de; padding: 0.5rem 0.75rem;";
const IMAGE_STYLE: &str = "max-width: 100%; height: auto;";
const FIGURE_STYLE: &str = "margin: 1rem 0; text-align: center;";
const FIGCAPTION_STYLE: &str = "margin-top: 0.5rem; font-size: 0.875rem; color: #57606a;";

/// Inline-styled output with a fixed visual theme.
pub struct StyledBackend;

fn with_alignment(base: &str, align: Alignment) -> String {
    match align {
        Alignment::Left => base.to_owned(),
        Alignment::Center | Alignment::Right => {
            format!("{base} text-align: {};", align.as_str())
        }
    }
}

fn heading_size(level: u8) -> &'static str {
    let index = usize::from(level.clamp(1, 6)) - 1;
    HEADING_SIZES[index]
}

impl SerializeBackend for StyledBackend {
    const CODE_LINE_BREAKS: bool = true;

    fn paragraph_start(align: Alignment, out: &mut String) {
        write!(out, r#"<p style="{}">"#, with_alignment(PARAGRAPH_STYLE, align)).unwrap();
    }

    fn heading_start(level: u8, align: Alignment, out: &mut String) {
        let base = format!("font-size: {}; {HEADING_STYLE}", heading_size(level));
        write!(out, r#"<h{level} style="{}">"#, with_alignment(&base, align)).unwrap();
    }

    fn blockquote_start(align: Alignment, out: &mut String) {
        write!(
            out,
            r#"<blockquote style="{}">"#,
            with_alignment(BLOCKQUOTE_STYLE, align)
        )
        .unwrap();
    }

    fn code_start(lang: &str, out: &mut String) {
        write!(
            out,
            r#"<code data-language="{lang}" data-highlighted="true" style="{CODE_STYLE}">"#
        )
        .unwrap();
    }

    fn list_start(ordered: bool, depth: usize, out: &mut String) {
        let (tag, markers) = if ordered {
            ("ol", ORDERED_MARKERS)
        } else {
            ("ul", UNORDERED_MARKERS)
        };
        let marker = markers[depth % markers.len()];
        write!(
            out,
            r#"<{tag} style="list-style-type: {marker}; {LIST_STYLE}">"#
        )
        .unwrap();
    }

    fn list_item_start(out: &mut String) {
        write!(out, r#"<li style="{LIST_ITEM_STYLE}">"#).unwrap();
    }

    fn table_start(out: &mut String) {
        write!(out, r#"<table style="{TABLE_STYLE}">"#).unwrap();
    }

    fn row_start(out: &mut String) {
        out.push_str("<tr>");
    }

    fn cell_start(header: bool, out: &mut String) {
        if header {
            write!(out, r#"<th style="{HEADER_CELL_STYLE}">"#).unwrap();
        } else {
            write!(out, r#"<td style="{CELL_STYLE}">"#).unwrap();
        }
    }

    fn image(image: &Image, out: &mut String) {
        out.push_str("<img");
        image_attributes(image, out);
        write!(out, r#" style="{IMAGE_STYLE}">"#).unwrap();
    }

    fn figure_start(out: &mut String) {
        write!(out, r#"<figure style="{FIGURE_STYLE}">"#).unwrap();
    }

    fn figcaption_start(out: &mut String) {
        write!(out, r#"<figcaption style="{FIGCAPTION_STYLE}">"#).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::model::{Block, CodeBlock, Document, Heading, List, ListItem, Paragraph, Text};
    use crate::serializer::to_styled_html;

    #[test]
    fn test_heading_sizes() {
        assert_eq!(heading_size(1), "2rem");
        assert_eq!(heading_size(6), "0.875rem");
        let html = to_styled_html(&Document::new(vec![Block::Heading(Heading::new(
            3,
            vec![Text::plain("T")],
        ))]));
        assert!(html.starts_with(r#"<h3 style="font-size: 1.25rem;"#));
        assert!(html.ends_with(">T</h3>"));
    }

    #[test]
    fn test_alignment_becomes_text_align() {
        let html = to_styled_html(&Document::new(vec![Block::Paragraph(
            Paragraph::plain("x").with_align(Alignment::Center),
        )]));
        assert!(html.contains("text-align: center;"));
    }

    #[test]
    fn test_code_newlines_become_breaks() {
        let html = to_styled_html(&Document::new(vec![Block::Code(CodeBlock::new(
            "a\nb",
            Some("text".to_owned()),
        ))]));
        assert!(html.contains(">a<br>b</code>"));
        assert!(html.contains("font-family: ui-monospace"));
    }

    #[test]
    fn test_nested_list_markers_vary_by_depth() {
        let inner = List {
            ordered: false,
            items: vec![ListItem::new(Paragraph::plain("B"))],
        };
        let outer = List {
            ordered: false,
            items: vec![ListItem::new(Paragraph::plain("A")).with_child(inner)],
        };
        let html = to_styled_html(&Document::new(vec![Block::List(outer)]));
        assert!(html.starts_with(r#"<ul style="list-style-type: disc;"#));
        assert!(html.contains(r#"<ul style="list-style-type: circle;"#));
    }

    #[test]
    fn test_styled_output_parses_back() {
        let doc = Document::new(vec![
            Block::Paragraph(Paragraph::plain("hello")),
            Block::Code(CodeBlock::new("a\nb", Some("bash".to_owned()))),
        ]);
        assert_eq!(crate::parse(&to_styled_html(&doc)), doc);
    }
}
