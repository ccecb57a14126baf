use serde::{Deserialize, Serialize};

use super::{parse_questions, ParsedQuestion};

/// A parsed question tagged with its section and answer-presence flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuestionForTraining {
    #[serde(flatten)]
    pub question: ParsedQuestion,
    pub section_id: String,
    pub has_answer_ru: bool,
    pub has_answer_en: bool,
    pub has_answer_senior: bool,
}

impl ParsedQuestionForTraining {
    pub fn new(question: ParsedQuestion, section_id: &str) -> Self {
        Self {
            section_id: section_id.to_string(),
            has_answer_ru: question.answer_ru.is_some(),
            has_answer_en: question.answer_en.is_some(),
            has_answer_senior: question.answer_senior.is_some(),
            question,
        }
    }
}

pub fn parse_for_training(markdown: &str, section_id: &str) -> Vec<ParsedQuestionForTraining> {
    parse_questions(markdown)
        .into_iter()
        .map(|q| ParsedQuestionForTraining::new(q, section_id))
        .collect()
}
