pub mod answers;
pub mod code;
pub mod markers;
pub mod questions;
pub mod training;

use serde::{Deserialize, Serialize};

use answers::{extract_answer, AnswerKind};
pub use code::CodeBlock;

/// One question extracted from a markdown document. Derived on every parse, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuestion {
    pub id: String,
    pub number: u32,
    pub question: String,
    pub question_raw: String,
    pub answer_ru: Option<String>,
    pub answer_en: Option<String>,
    pub answer_senior: Option<String>,
    pub code_blocks: Vec<CodeBlock>,
    pub raw_markdown: String,
}

impl ParsedQuestion {
    pub fn answer(&self, kind: AnswerKind) -> Option<&str> {
        match kind {
            AnswerKind::Ru => self.answer_ru.as_deref(),
            AnswerKind::En => self.answer_en.as_deref(),
            AnswerKind::Senior => self.answer_senior.as_deref(),
        }
    }
}

/// Pipeline: headings → spans → (answers + code blocks) per span.
///
/// Numbering is positional: the n-th heading becomes `question-n` whatever digits it shows.
pub fn parse_questions(markdown: &str) -> Vec<ParsedQuestion> {
    questions::split_questions(markdown)
        .into_iter()
        .enumerate()
        .map(|(i, span)| {
            let text = span.text(markdown);
            let number = i as u32 + 1;
            ParsedQuestion {
                id: format!("question-{}", number),
                number,
                question: clean_heading(&span.heading),
                question_raw: span.heading,
                answer_ru: extract_answer(text, AnswerKind::Ru),
                answer_en: extract_answer(text, AnswerKind::En),
                answer_senior: extract_answer(text, AnswerKind::Senior),
                code_blocks: code::extract_code_blocks(text),
                raw_markdown: text.to_string(),
            }
        })
        .collect()
}

/// Strip `**` and backticks; no other markdown is touched.
pub fn clean_heading(raw: &str) -> String {
    raw.replace("**", "").replace('`', "")
}

// ── Tests ──
