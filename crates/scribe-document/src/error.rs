//! Error types for document conversion.

/// Failure converting a single HTML node into a block.
///
/// Never escapes [`crate::parse`]: the parser downgrades the node to a plain
/// paragraph of its text content and keeps going.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NodeError {
    /// `<table>` without any `<tr>`.
    #[error("table has no rows")]
    EmptyTable,

    /// `<img>` without a usable `src`.
    #[error("image has no source")]
    MissingImageSource,

    /// Heading tag whose level is outside 1-6.
    #[error("invalid heading tag: {0}")]
    InvalidHeadingLevel(String),
}
