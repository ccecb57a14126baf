use std::sync::LazyLock;

use regex::Regex;

use super::markers::{self, Marker, MarkerKind, EN_MARKER, RU_MARKER, SENIOR_MARKER};

static HEADING_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^###").unwrap());

/// How many characters after an English-labeled marker are checked for Cyrillic prose.
pub const CYRILLIC_LOOKAHEAD_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    Ru,
    En,
    Senior,
}

impl AnswerKind {
    pub fn marker(self) -> &'static str {
        match self {
            AnswerKind::Ru => RU_MARKER,
            AnswerKind::En => EN_MARKER,
            AnswerKind::Senior => SENIOR_MARKER,
        }
    }

    pub fn lang(self) -> &'static str {
        match self {
            AnswerKind::Ru => "ru",
            AnswerKind::En => "en",
            AnswerKind::Senior => "senior",
        }
    }
}

/// Why an answer block ends where it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    SpanEnd,
    EnglishMarker,
    SeniorMarker,
    CyrillicSection,
    Heading,
}

/// Extract the body that follows `kind`'s marker inside one question span.
///
/// Every candidate end offset is collected and the nearest one wins. Returns
/// `None` when the marker is missing or the body trims to nothing.
pub fn extract_answer(span: &str, kind: AnswerKind) -> Option<String> {
    let marker_pos = span.find(kind.marker())?;
    let start = marker_pos + kind.marker().len();
    let (end, _) = answer_end(span, start, kind);
    let body = span[start..end].trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Nearest end offset for a block starting at `start`, tagged with its cause.
pub fn answer_end(span: &str, start: usize, kind: AnswerKind) -> (usize, Boundary) {
    let mut candidates = vec![(span.len(), Boundary::SpanEnd)];

    let after = |needle: &str| span[start..].find(needle).map(|i| start + i);
    match kind {
        AnswerKind::Ru => {
            // An English marker bounds the Russian block ahead of the Senior one.
            if let Some(pos) = after(EN_MARKER) {
                candidates.push((pos, Boundary::EnglishMarker));
            } else if let Some(pos) = after(SENIOR_MARKER) {
                candidates.push((pos, Boundary::SeniorMarker));
            }
        }
        AnswerKind::En => {
            if let Some(pos) = after(SENIOR_MARKER) {
                candidates.push((pos, Boundary::SeniorMarker));
            }
            if let Some(pos) = cyrillic_section_start(span, start) {
                candidates.push((pos, Boundary::CyrillicSection));
            }
        }
        AnswerKind::Senior => {}
    }

    if let Some(m) = HEADING_LINE_RE.find_at(span, start) {
        candidates.push((m.start(), Boundary::Heading));
    }

    candidates
        .into_iter()
        .min_by_key(|&(pos, _)| pos)
        .unwrap_or((span.len(), Boundary::SpanEnd))
}

/// First marker at or after `start` that switches the text back to Russian.
///
/// That is either a Cyrillic-labeled section, or an English-labeled marker whose
/// own trailing text (up to the next marker) contains Cyrillic within the lookahead window.
fn cyrillic_section_start(span: &str, start: usize) -> Option<usize> {
    let found: Vec<Marker> = markers::find_markers(span)
        .into_iter()
        .filter(|m| m.start >= start)
        .collect();

    found.iter().enumerate().find_map(|(i, m)| match m.kind {
        MarkerKind::ForeignSection => Some(m.start),
        MarkerKind::Other | MarkerKind::English if !markers::contains_cyrillic(&m.label) => {
            let stop = found.get(i + 1).map(|next| next.start).unwrap_or(span.len());
            let window: String = span[m.end..stop]
                .chars()
                .take(CYRILLIC_LOOKAHEAD_CHARS)
                .collect();
            markers::contains_cyrillic(&window).then_some(m.start)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE: &str = "### 1. Q?\n**Ответ:**\nRU TEXT\n**Answer EN:**\nEN TEXT\n**Ответ Senior:**\nSR TEXT\n";

    #[test]
    fn three_answers_are_disjoint() {
        let ru = extract_answer(THREE, AnswerKind::Ru).unwrap();
        let en = extract_answer(THREE, AnswerKind::En).unwrap();
        let sr = extract_answer(THREE, AnswerKind::Senior).unwrap();
        assert_eq!(ru, "RU TEXT");
        assert_eq!(en, "EN TEXT");
        assert_eq!(sr, "SR TEXT");
    }

    #[test]
    fn missing_marker_is_none() {
        assert_eq!(extract_answer("### 1. Q?\nsome text", AnswerKind::Ru), None);
        assert_eq!(extract_answer("### 1. Q?\nsome text", AnswerKind::Senior), None);
    }

    #[test]
    fn empty_body_is_none() {
        let span = "### 1. Q?\n**Ответ:**\n   \n**Answer EN:**\nEN";
        assert_eq!(extract_answer(span, AnswerKind::Ru), None);
        assert_eq!(extract_answer(span, AnswerKind::En).as_deref(), Some("EN"));
    }

    #[test]
    fn russian_falls_back_to_senior_bound() {
        let span = "**Ответ:**\nRU\n**Ответ Senior:**\nSR";
        assert_eq!(extract_answer(span, AnswerKind::Ru).as_deref(), Some("RU"));
        assert_eq!(
            answer_end(span, RU_MARKER.len(), AnswerKind::Ru).1,
            Boundary::SeniorMarker
        );
    }

    #[test]
    fn russian_keeps_its_own_cyrillic_sections() {
        let span = "**Ответ:**\nТекст.\n**Пример:**\nещё текст\n**Answer EN:**\nEN";
        let ru = extract_answer(span, AnswerKind::Ru).unwrap();
        assert!(ru.contains("**Пример:**"));
        assert!(ru.contains("ещё текст"));
        assert!(!ru.contains("EN"));
    }

    #[test]
    fn english_cut_at_cyrillic_section() {
        let span = "**Answer EN:** English answer. **Особенности:** Russian trailing prose.";
        let en = extract_answer(span, AnswerKind::En).unwrap();
        assert_eq!(en, "English answer.");
    }

    #[test]
    fn english_subsection_kept_when_followed_by_english() {
        let span = "**Answer EN:**\nIntro.\n**Pros:**\n- fast\n- small\n";
        let en = extract_answer(span, AnswerKind::En).unwrap();
        assert!(en.contains("**Pros:**"));
        assert!(en.contains("- small"));
    }

    #[test]
    fn english_subsection_followed_by_russian_prose_is_a_boundary() {
        let span = "**Answer EN:**\nIntro.\n**Summary:**\nКратко: замыкание хранит окружение.";
        let en = extract_answer(span, AnswerKind::En).unwrap();
        assert_eq!(en, "Intro.");
        let start = span.find(EN_MARKER).unwrap() + EN_MARKER.len();
        assert_eq!(answer_end(span, start, AnswerKind::En).1, Boundary::CyrillicSection);
    }

    #[test]
    fn cyrillic_beyond_lookahead_window_is_ignored() {
        let filler = "x".repeat(CYRILLIC_LOOKAHEAD_CHARS + 10);
        let span = format!("**Answer EN:**\nIntro.\n**Notes:**\n{}\nпотом русский", filler);
        let en = extract_answer(&span, AnswerKind::En).unwrap();
        assert!(en.contains("**Notes:**"));
        assert!(en.contains("потом русский"));
    }

    #[test]
    fn nearest_boundary_wins() {
        let span = "**Answer EN:**\nEN\n**Особенности:**\nтекст\n**Ответ Senior:**\nSR";
        let start = span.find(EN_MARKER).unwrap() + EN_MARKER.len();
        let (end, boundary) = answer_end(span, start, AnswerKind::En);
        assert_eq!(boundary, Boundary::CyrillicSection);
        assert_eq!(&span[start..end], "\nEN\n");
    }

    #[test]
    fn heading_bounds_every_answer() {
        let span = "**Ответ Senior:**\nSR\n### Notes\nafter";
        assert_eq!(extract_answer(span, AnswerKind::Senior).as_deref(), Some("SR"));
    }

    #[test]
    fn senior_ignores_cyrillic_sections() {
        let span = "**Ответ Senior:**\nSR\n**Особенности:**\nтекст";
        let sr = extract_answer(span, AnswerKind::Senior).unwrap();
        assert!(sr.contains("Особенности"));
    }
}
