use std::sync::LazyLock;

use regex::Regex;

static QUESTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^###[ \t]+\d+\.[ \t]+(.+)$").unwrap());

/// One question's slice of the document: `[start, end)` in bytes, plus its heading text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpan {
    pub start: usize,
    pub end: usize,
    pub heading: String,
}

impl QuestionSpan {
    pub fn text<'a>(&self, markdown: &'a str) -> &'a str {
        &markdown[self.start..self.end]
    }
}

/// Partition `markdown` into contiguous spans, one per `### <n>. <text>` heading.
///
/// The digits in the heading are not interpreted. Text before the first heading
/// belongs to no span.
pub fn split_questions(markdown: &str) -> Vec<QuestionSpan> {
    let heads: Vec<(usize, String)> = QUESTION_HEADING_RE
        .captures_iter(markdown)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            Some((start, caps[1].trim().to_string()))
        })
        .collect();

    heads
        .iter()
        .enumerate()
        .map(|(i, (start, heading))| QuestionSpan {
            start: *start,
            end: heads.get(i + 1).map(|(next, _)| *next).unwrap_or(markdown.len()),
            heading: heading.clone(),
        })
        .collect()
}
