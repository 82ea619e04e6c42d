//! Typed rich-text document tree.
//!
//! A [`Document`] is an ordered list of [`Block`]s. Blocks carrying text hold a
//! flat inline run of [`Text`] leaves, each with a [`TextFormat`] bitmask. The
//! whole tree derives serde so it can travel as JSON to a persistence layer.

use std::borrow::Cow;
use std::ops::{BitOr, BitOrAssign};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::detect::detect;

/// Matches `<tag ...>` / `</tag>` shaped substrings.
static MARKUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("invalid markup regex"));

/// Check whether a string contains tag-shaped markup.
pub(crate) fn contains_markup(text: &str) -> bool {
    MARKUP_PATTERN.is_match(text)
}

/// Root of a document tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Block-level children in document order.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a document from blocks.
    #[must_use]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Deserialize a document from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the document to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Block-level node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    Quote(Paragraph),
    Code(CodeBlock),
    List(List),
    Table(Table),
    Image(Image),
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Parse an alignment keyword (`left`, `center`, `right`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// CSS / attribute keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
    fn is_left(&self) -> bool {
        *self == Self::Left
    }
}

/// Inline formatting bitmask.
///
/// Bits: 1 = bold, 2 = italic, 4 = strikethrough, 8 = underline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextFormat(u8);

impl TextFormat {
    pub const PLAIN: Self = Self(0);
    pub const BOLD: Self = Self(1);
    pub const ITALIC: Self = Self(2);
    pub const STRIKETHROUGH: Self = Self(4);
    pub const UNDERLINE: Self = Self(8);

    const ALL_BITS: u8 = 0b1111;

    /// Build a mask from raw bits, discarding unknown bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    /// Raw bit value.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_plain(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for TextFormat {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for TextFormat {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Inline text leaf.
///
/// A payload containing tag-shaped markup is treated as pre-formed HTML and
/// emitted verbatim by the serializer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_plain_format")]
    pub format: TextFormat,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde skip_serializing_if signature
fn is_plain_format(format: &TextFormat) -> bool {
    format.is_plain()
}

impl Text {
    #[must_use]
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Unformatted text.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextFormat::PLAIN)
    }

    /// Whether the payload is pre-formed HTML (the escape hatch).
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        contains_markup(&self.text)
    }
}

/// Inline-bearing block: used for paragraphs, quotes, list item bodies and
/// table cell bodies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub children: Vec<Text>,
    #[serde(default, skip_serializing_if = "Alignment::is_left")]
    pub align: Alignment,
}

impl Paragraph {
    #[must_use]
    pub fn new(children: Vec<Text>) -> Self {
        Self {
            children,
            align: Alignment::Left,
        }
    }

    /// Paragraph holding a single unformatted text leaf.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![Text::plain(text)])
    }

    #[must_use]
    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Concatenated text of all children, ignoring formatting.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Heading, level 1-6.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawHeading")]
pub struct Heading {
    pub level: u8,
    pub children: Vec<Text>,
    #[serde(default, skip_serializing_if = "Alignment::is_left")]
    pub align: Alignment,
}

/// Wire form of [`Heading`] before the level is clamped.
#[derive(Deserialize)]
struct RawHeading {
    level: u8,
    children: Vec<Text>,
    #[serde(default)]
    align: Alignment,
}

impl From<RawHeading> for Heading {
    fn from(raw: RawHeading) -> Self {
        Self {
            align: raw.align,
            ..Self::new(raw.level, raw.children)
        }
    }
}

impl Heading {
    /// Create a heading; the level is clamped to 1-6.
    #[must_use]
    pub fn new(level: u8, children: Vec<Text>) -> Self {
        Self {
            level: level.clamp(1, 6),
            children,
            align: Alignment::Left,
        }
    }
}

/// Code block with an optional language tag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl CodeBlock {
    #[must_use]
    pub fn new(code: impl Into<String>, language: Option<String>) -> Self {
        Self {
            code: code.into(),
            language,
        }
    }

    /// Explicit language, or the detector's guess when absent.
    #[must_use]
    pub fn resolved_language(&self) -> Cow<'_, str> {
        match self.language.as_deref() {
            Some(lang) if !lang.is_empty() => Cow::Borrowed(lang),
            _ => Cow::Borrowed(detect(&self.code)),
        }
    }
}

/// Ordered or unordered list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// List item: one inline run plus any nested lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: Paragraph,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<List>,
}

impl ListItem {
    #[must_use]
    pub fn new(content: Paragraph) -> Self {
        Self {
            content,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, list: List) -> Self {
        self.children.push(list);
        self
    }
}

/// Table. Rows may have different cell counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub header: bool,
    pub content: Paragraph,
}

impl TableCell {
    #[must_use]
    pub fn new(header: bool, content: Paragraph) -> Self {
        Self { header, content }
    }
}

/// Image. Missing width/height mean "auto".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Image {
    #[must_use]
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            ..Self::default()
        }
    }
}
