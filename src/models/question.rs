use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

use super::Answer;

/// Values offered for a true/false question, in display order.
pub const TRUE_FALSE_CHOICES: [&str; 2] = ["True", "False"];

/// A question record as it appears in the JSON document.
///
/// `correctAnswer` is kept as a raw JSON value because its shape depends on
/// `type`; the loader checks it once the type is known.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<Value>,
}

/// A validated question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    /// `correct` is `"True"` or `"False"`.
    TrueFalse { correct: String },
    MultipleChoice { options: Vec<String>, correct: String },
    Checkbox { options: Vec<String>, correct: BTreeSet<String> },
    /// `correct` is compared numerically, so it is kept as written.
    NumberInput { correct: String },
}

impl Question {
    pub fn new(text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// The values a presenter should offer as selectable choices.
    ///
    /// Empty for free-text questions.
    pub fn choices(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::TrueFalse { .. } => TRUE_FALSE_CHOICES.to_vec(),
            QuestionKind::MultipleChoice { options, .. }
            | QuestionKind::Checkbox { options, .. } => {
                options.iter().map(String::as_str).collect()
            }
            QuestionKind::NumberInput { .. } => Vec::new(),
        }
    }

    /// Whether more than one choice may be marked at once.
    pub fn is_multi_select(&self) -> bool {
        matches!(self.kind, QuestionKind::Checkbox { .. })
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self.kind, QuestionKind::NumberInput { .. })
    }

    pub fn correct_answer(&self) -> Answer {
        match &self.kind {
            QuestionKind::TrueFalse { correct }
            | QuestionKind::MultipleChoice { correct, .. }
            | QuestionKind::NumberInput { correct } => Answer::Single(correct.clone()),
            QuestionKind::Checkbox { correct, .. } => Answer::Set(correct.clone()),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            QuestionKind::TrueFalse { .. } => "true / false",
            QuestionKind::MultipleChoice { .. } => "multiple choice",
            QuestionKind::Checkbox { .. } => "select all that apply",
            QuestionKind::NumberInput { .. } => "number",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_question_deserialization() {
        let json = r#"{
            "text": "Pick all primes",
            "type": "checkbox",
            "options": ["2", "3", "4"],
            "correctAnswer": ["2", "3"]
        }"#;
        let raw: RawQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(raw.kind, "checkbox");
        assert_eq!(raw.options.len(), 3);
        assert!(raw.correct_answer.unwrap().is_array());
    }

    #[test]
    fn test_missing_options_default_to_empty() {
        let json = r#"{"text": "2 + 2?", "type": "number_input", "correctAnswer": 4}"#;
        let raw: RawQuestion = serde_json::from_str(json).unwrap();
        assert!(raw.options.is_empty());
    }

    #[test]
    fn test_choices_per_kind() {
        let tf = Question::new(
            "Rust has a GC",
            QuestionKind::TrueFalse {
                correct: "False".to_string(),
            },
        );
        assert_eq!(tf.choices(), vec!["True", "False"]);

        let num = Question::new(
            "6 * 7",
            QuestionKind::NumberInput {
                correct: "42".to_string(),
            },
        );
        assert!(num.choices().is_empty());
        assert!(num.is_free_text());
    }
}
