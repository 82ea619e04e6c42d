//! HTML to rich-text document conversion.
//!
//! This crate converts loosely-structured HTML fragments (as produced by rich
//! text editors and AI generators) into a typed [`Document`] tree, and
//! serializes the tree back to HTML in two variants.
//!
//! # Architecture
//!
//! - [`parse`] / [`HtmlParser`]: tolerant HTML5 parsing. Never fails; nodes that
//!   cannot be converted degrade to plain paragraphs.
//! - [`to_styled_html`] / [`to_clean_html`]: one generic tree walk
//!   ([`HtmlSerializer`]) over a [`SerializeBackend`]. Clean output parses back
//!   to an equivalent document.
//! - [`detect`]: code language guessing for untagged code blocks.
//!
//! # Example
//!
//! ```
//! use scribe_document::{parse, to_clean_html};
//!
//! let doc = parse("<p><b>Bold</b> text</p>");
//! assert_eq!(to_clean_html(&doc), "<p><strong>Bold</strong> text</p>");
//! ```

mod detect;
mod entities;
mod error;
mod model;
mod parser;
mod serializer;

pub use detect::{CodeLanguage, detect, detect_language};
pub use entities::decode_entities;
pub use error::NodeError;
pub use model::{
    Alignment, Block, CodeBlock, Document, Heading, Image, List, ListItem, Paragraph, Table,
    TableCell, TableRow, Text, TextFormat,
};
pub use parser::{HtmlParser, parse, strip_style_attributes};
pub use serializer::{
    CleanBackend, HtmlSerializer, SerializeBackend, StyledBackend, escape_html, to_clean_html,
    to_styled_html,
};
