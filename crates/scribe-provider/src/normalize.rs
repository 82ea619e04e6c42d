//! Completion output cleanup.

use std::sync::LazyLock;

use regex::Regex;

/// Opening Markdown fence with an optional info string, at the very start.
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[\w+-]*[ \t]*\r?\n?").expect("invalid leading fence regex"));

/// Closing Markdown fence at the very end.
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```\s*$").expect("invalid trailing fence regex"));

/// Strip a Markdown code fence wrapped around the whole completion.
///
/// Models often answer "HTML only" requests with ```` ```html ... ``` ````.
/// Fences inside the content are left alone.
pub fn strip_code_fences(content: &str) -> String {
    let without_leading = LEADING_FENCE.replace(content, "");
    let without_trailing = TRAILING_FENCE.replace(&without_leading, "");
    without_trailing.trim().to_owned()
}
