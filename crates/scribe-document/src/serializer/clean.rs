//! Clean semantic HTML backend.

use std::fmt::Write;

use super::backend::SerializeBackend;
use super::image_attributes;
use crate::model::{Alignment, Image};

/// Minimal markup without `style` attributes.
///
/// Non-left alignment is kept as an `align` attribute so the parser can
/// recover it.
pub struct CleanBackend;

fn align_attribute(align: Alignment) -> String {
    match align {
        Alignment::Left => String::new(),
        Alignment::Center | Alignment::Right => format!(r#" align="{}""#, align.as_str()),
    }
}

impl SerializeBackend for CleanBackend {
    const CODE_LINE_BREAKS: bool = false;

    fn paragraph_start(align: Alignment, out: &mut String) {
        write!(out, "<p{}>", align_attribute(align)).unwrap();
    }

    fn heading_start(level: u8, align: Alignment, out: &mut String) {
        write!(out, "<h{level}{}>", align_attribute(align)).unwrap();
    }

    fn blockquote_start(align: Alignment, out: &mut String) {
        write!(out, "<blockquote{}>", align_attribute(align)).unwrap();
    }

    fn code_start(lang: &str, out: &mut String) {
        write!(
            out,
            r#"<code data-language="{lang}" data-highlighted="true">"#
        )
        .unwrap();
    }

    fn list_start(ordered: bool, _depth: usize, out: &mut String) {
        out.push_str(if ordered { "<ol>" } else { "<ul>" });
    }

    fn list_item_start(out: &mut String) {
        out.push_str("<li>");
    }

    fn table_start(out: &mut String) {
        out.push_str("<table>");
    }

    fn row_start(out: &mut String) {
        out.push_str("<tr>");
    }

    fn cell_start(header: bool, out: &mut String) {
        out.push_str(if header { "<th>" } else { "<td>" });
    }

    fn image(image: &Image, out: &mut String) {
        out.push_str("<img");
        image_attributes(image, out);
        out.push('>');
    }

    fn figure_start(out: &mut String) {
        out.push_str("<figure>");
    }

    fn figcaption_start(out: &mut String) {
        out.push_str("<figcaption>");
    }
}
