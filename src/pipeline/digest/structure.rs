//! Soft check of the "3–5 themes, 1–2 quotes each" shape.
//!
//! The shape is requested by instruction only. This heuristic never fails a
//! run; the runner logs a warning when the final text looks off.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Heading, numbered item, or a bold-only line.
static THEME_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:#{1,6}\s+\S|\d{1,2}[.)]\s+\S|\*\*[^*]+\*\*\s*:?\s*$)").expect("valid regex")
});

/// Straight or curly double-quoted span of at least three characters.
static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"\n]{3,}"|“[^”\n]{3,}”"#).expect("valid regex"));

pub const MIN_THEMES: usize = 3;
pub const MAX_THEMES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    pub theme_count: usize,
    pub quote_count: usize,
}

impl StructureReport {
    /// True when the counts are consistent with 3–5 themes of 1–2 quotes.
    pub fn within_contract(&self) -> bool {
        (MIN_THEMES..=MAX_THEMES).contains(&self.theme_count)
            && self.quote_count >= self.theme_count
            && self.quote_count <= self.theme_count * 2
    }
}

pub fn inspect_structure(text: &str) -> StructureReport {
    let mut theme_count = 0;
    let mut quote_count = 0;

    for line in text.lines() {
        if THEME_LINE_RE.is_match(line) {
            theme_count += 1;
        }
        let inline = QUOTE_RE.find_iter(line).count();
        if inline > 0 {
            quote_count += inline;
        } else if line.trim_start().starts_with('>') {
            quote_count += 1;
        }
    }

    StructureReport {
        theme_count,
        quote_count,
    }
}
