use std::sync::LazyLock;

use regex::Regex;

static BOLD_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*\n]+):\*\*").unwrap());

pub const RU_MARKER: &str = "**Ответ:**";
pub const EN_MARKER: &str = "**Answer EN:**";
pub const SENIOR_MARKER: &str = "**Ответ Senior:**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Russian,
    English,
    Senior,
    /// Cyrillic label that is not one of the answer markers, e.g. `**Особенности:**`.
    ForeignSection,
    /// Anything else, e.g. `**Pros:**`.
    Other,
}

/// A `**<label>:**` token found in a text span. Offsets are byte offsets into that span.
#[derive(Debug, Clone)]
pub struct Marker {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub kind: MarkerKind,
}

pub fn classify(label: &str) -> MarkerKind {
    match label.trim() {
        "Ответ" => MarkerKind::Russian,
        "Answer EN" => MarkerKind::English,
        "Ответ Senior" => MarkerKind::Senior,
        l if contains_cyrillic(l) => {
            let lower = l.to_lowercase();
            if lower.contains("ответ") || lower.contains("answer en") {
                MarkerKind::Other
            } else {
                MarkerKind::ForeignSection
            }
        }
        _ => MarkerKind::Other,
    }
}

/// All bold markers in `text`, in source order.
pub fn find_markers(text: &str) -> Vec<Marker> {
    BOLD_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps[1].to_string();
            let kind = classify(&label);
            Some(Marker {
                start: whole.start(),
                end: whole.end(),
                label,
                kind,
            })
        })
        .collect()
}

pub fn contains_cyrillic(text: &str) -> bool {
    text.chars().any(is_cyrillic)
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}
