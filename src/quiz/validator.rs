use std::collections::BTreeSet;

use crate::models::{Answer, Question, QuestionKind};

/// Whether `answer` is the right answer to `question`.
///
/// A wrong-shaped answer is simply incorrect.
pub fn is_correct(question: &Question, answer: &Answer) -> bool {
    match (&question.kind, answer) {
        (QuestionKind::TrueFalse { correct }, Answer::Single(given)) => check_exact(given, correct),
        (QuestionKind::MultipleChoice { correct, .. }, Answer::Single(given)) => {
            check_exact(given, correct)
        }
        (QuestionKind::Checkbox { correct, .. }, Answer::Set(given)) => check_set(given, correct),
        (QuestionKind::NumberInput { correct }, Answer::Single(given)) => {
            check_number(given, correct)
        }
        _ => false,
    }
}

fn check_exact(given: &str, correct: &str) -> bool {
    given == correct
}

fn check_set(given: &BTreeSet<String>, correct: &BTreeSet<String>) -> bool {
    given == correct
}

fn check_number(given: &str, correct: &str) -> bool {
    match (parse_number(given), parse_number(correct)) {
        (Some(given), Some(correct)) => given == correct,
        _ => false,
    }
}

/// A finite number, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
