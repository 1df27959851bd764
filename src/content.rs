//! FAQ content model: heading, optional description and ordered Q&A items.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSpec {
    pub heading: String,
    /// Empty means the description paragraph is omitted.
    pub description: String,
    /// Render order.
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl FaqItem {
    pub fn new(id: impl Into<String>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Question text for display; `"Question {n}"` when blank. `position` is 1-based.
    pub fn display_question(&self, position: usize) -> String {
        if self.question.trim().is_empty() {
            format!("Question {}", position)
        } else {
            self.question.clone()
        }
    }

    /// Answer text for display; `"Answer {n}"` when blank. `position` is 1-based.
    pub fn display_answer(&self, position: usize) -> String {
        if self.answer.trim().is_empty() {
            format!("Answer {}", position)
        } else {
            self.answer.clone()
        }
    }
}
