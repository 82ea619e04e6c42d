//! Serialization backend trait.
//!
//! Backends write opening tags (with whatever attributes their variant needs);
//! the shared tree walk in [`super::HtmlSerializer`] writes contents and
//! closing tags. Nothing here is stateful: all methods are associated
//! functions writing into a caller-owned buffer.

use crate::model::{Alignment, Image};

/// Variant-specific tag emission for the HTML serializer.
pub trait SerializeBackend {
    /// Whether code block newlines are emitted as `<br>` instead of literally.
    const CODE_LINE_BREAKS: bool;

    /// Write `<p ...>`.
    fn paragraph_start(align: Alignment, out: &mut String);

    /// Write `<h{level} ...>`.
    fn heading_start(level: u8, align: Alignment, out: &mut String);

    /// Write `<blockquote ...>`.
    fn blockquote_start(align: Alignment, out: &mut String);

    /// Write `<code ...>` for a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Resolved language tag, already HTML-escaped
    /// * `out` - Output buffer to write to
    fn code_start(lang: &str, out: &mut String);

    /// Write `<ul ...>` / `<ol ...>`. `depth` is 0 for top-level lists.
    fn list_start(ordered: bool, depth: usize, out: &mut String);

    /// Write `<li ...>`.
    fn list_item_start(out: &mut String);

    /// Write `<table ...>`.
    fn table_start(out: &mut String);

    /// Write `<tr ...>`.
    fn row_start(out: &mut String);

    /// Write `<th ...>` or `<td ...>`.
    fn cell_start(header: bool, out: &mut String);

    /// Write a complete `<img>` element.
    fn image(image: &Image, out: &mut String);

    /// Write `<figure ...>` for a captioned image.
    fn figure_start(out: &mut String);

    /// Write `<figcaption ...>`.
    fn figcaption_start(out: &mut String);
}
