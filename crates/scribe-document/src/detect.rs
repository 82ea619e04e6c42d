//! Code language detection from lexical cues.
//!
//! Detection is an ordered cascade of pattern checks; the first match wins and
//! there is no scoring. Order matters:
//!
//! - TypeScript markers are checked before JavaScript markers, so code that
//!   matches both is tagged `typescript`.
//! - The strict JSON parse attempt runs before the Python checks.

use std::sync::LazyLock;

use regex::Regex;

/// Languages the detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    Html,
    TypeScript,
    JavaScript,
    Css,
    Json,
    Python,
    Sql,
    Php,
    Bash,
    Text,
}

impl CodeLanguage {
    /// Tag written to `data-language`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Css => "css",
            Self::Json => "json",
            Self::Python => "python",
            Self::Sql => "sql",
            Self::Php => "php",
            Self::Bash => "bash",
            Self::Text => "text",
        }
    }
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid language detection regex")
}

static TS_TYPE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"[\w)\]?]\s*:\s*(string|number|boolean|any|unknown|void|never)\b")
});
static TS_GENERIC: LazyLock<Regex> =
    LazyLock::new(|| regex(r"\b[A-Za-z_]\w*<[A-Za-z_][\w\[\]]*(\s*,\s*[A-Za-z_][\w\[\]]*)*>"));
static JS_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    regex(
        r#"(?m)\bfunction\b|^\s*(const|let|var)\s+\w+|^\s*import\s+.*\bfrom\s+['"]|^\s*import\s+['"{*]|=>|\bconsole\.\w+\(|\brequire\(['"]"#,
    )
});
static CSS_RULE: LazyLock<Regex> =
    LazyLock::new(|| regex(r"[\w\-.#*\])]\s*\{\s*[\w-]+\s*:\s*[^;{}]+;"));
static PYTHON_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    regex(
        r"(?m)^\s*def\s+\w+\s*\(|^\s*class\s+\w+.*:\s*$|^\s*from\s+[\w.]+\s+import\s+|^\s*import\s+[\w.]+\s*$|\bprint\(",
    )
});
static SQL_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    regex(
        r"(?is)\bselect\b.+\bfrom\b|\binsert\s+into\b|\bcreate\s+table\b|\bupdate\s+\w+\s+set\b|\bdelete\s+from\b|\balter\s+table\b|\bdrop\s+table\b",
    )
});
static PHP_MARKERS: LazyLock<Regex> = LazyLock::new(|| regex(r"<\?php|\$\w+\s*=[^=]"));
static BASH_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    regex(r"(?m)^#!/(usr/)?bin/(env\s+)?(ba|z)?sh|^\s*(echo|sudo|apt-get|export|chmod|mkdir|cd)\s")
});

/// Guess the language tag for a code string. Returns `text` when nothing matches.
#[must_use]
pub fn detect(code: &str) -> &'static str {
    detect_language(code).as_str()
}

/// Guess the language of a code string.
#[must_use]
pub fn detect_language(code: &str) -> CodeLanguage {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return CodeLanguage::Text;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("<!doctype") || lower.contains("<html") || lower.contains("<div") {
        return CodeLanguage::Html;
    }

    if trimmed.contains("interface ")
        || trimmed.contains("implements ")
        || TS_TYPE_ANNOTATION.is_match(trimmed)
        || TS_GENERIC.is_match(trimmed)
    {
        return CodeLanguage::TypeScript;
    }

    if JS_MARKERS.is_match(trimmed) {
        return CodeLanguage::JavaScript;
    }

    if CSS_RULE.is_match(trimmed) {
        return CodeLanguage::Css;
    }

    if looks_like_json(trimmed) {
        return CodeLanguage::Json;
    }

    if PYTHON_MARKERS.is_match(trimmed) {
        return CodeLanguage::Python;
    }

    if SQL_MARKERS.is_match(trimmed) {
        return CodeLanguage::Sql;
    }

    if PHP_MARKERS.is_match(trimmed) {
        return CodeLanguage::Php;
    }

    if BASH_MARKERS.is_match(trimmed) {
        return CodeLanguage::Bash;
    }

    CodeLanguage::Text
}

/// Strict JSON parse attempt, limited to objects and arrays.
fn looks_like_json(code: &str) -> bool {
    let structured = (code.starts_with('{') && code.ends_with('}'))
        || (code.starts_with('[') && code.ends_with(']'));
    structured && serde_json::from_str::<serde_json::Value>(code).is_ok()
}
