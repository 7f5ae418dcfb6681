use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Input exactly as the presenter collected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAnswer {
    /// A radio group: the marked value, if any.
    Choice(Option<String>),
    /// A checkbox group: every checked value, in display order.
    Checked(Vec<String>),
    /// A text box.
    Text(String),
}

impl RawAnswer {
    /// True when nothing was marked, checked, or typed.
    pub fn is_empty(&self) -> bool {
        match self {
            RawAnswer::Choice(None) => true,
            RawAnswer::Choice(Some(value)) | RawAnswer::Text(value) => value.trim().is_empty(),
            RawAnswer::Checked(values) => values.is_empty(),
        }
    }
}

/// A normalized answer in the shape its question compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Set(BTreeSet<String>),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(value) => write!(f, "{}", value),
            Answer::Set(values) => {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

/// One answered question, in the order questions were encountered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredRecord {
    pub question: String,
    pub user_answer: Answer,
    pub correct_answer: Answer,
    #[serde(default)]
    pub is_correct: bool,
}
