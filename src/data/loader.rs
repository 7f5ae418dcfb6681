use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::shuffle;
use crate::models::{Question, QuestionKind, RawQuestion};

/// Why a question document could not be turned into a quiz.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question document must contain at least one question")]
    Empty,
    /// `index` is zero-based; the message counts from one.
    #[error("question {} is malformed: {reason}", .index + 1)]
    MalformedQuestion { index: usize, reason: String },
}

/// The ordered set of questions a quiz draws its sessions from.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validate raw records into questions, failing on the first bad one.
    pub fn load(records: Vec<RawQuestion>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let questions = records
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                parse_question(raw).map_err(|reason| LoadError::MalformedQuestion { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = questions.len(), "question bank loaded");
        Ok(Self { questions })
    }

    pub fn from_questions(questions: Vec<Question>) -> Result<Self, LoadError> {
        if questions.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(Self { questions })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let records: Vec<RawQuestion> = serde_json::from_str(json)?;
        Self::load(records)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// A freshly shuffled copy of the bank, for one session.
    pub fn shuffled(&self) -> Vec<Question> {
        self.shuffled_with(&mut rand::rng())
    }

    pub fn shuffled_with<R: Rng>(&self, rng: &mut R) -> Vec<Question> {
        let mut questions = self.questions.clone();
        shuffle(&mut questions, rng);
        questions
    }
}

fn parse_question(raw: RawQuestion) -> Result<Question, String> {
    let correct = raw
        .correct_answer
        .ok_or_else(|| "missing correctAnswer".to_string())?;

    let kind = match raw.kind.as_str() {
        "true_false" | "TrueFalse" => QuestionKind::TrueFalse {
            correct: parse_true_false(&correct)?,
        },
        "multiple_choice" | "MultipleChoice" => {
            require_options(&raw.options)?;
            let correct = expect_string(&correct)?;
            if !raw.options.contains(&correct) {
                return Err(format!("correct answer {:?} is not one of the options", correct));
            }
            QuestionKind::MultipleChoice {
                options: raw.options,
                correct,
            }
        }
        "checkbox" | "Checkbox" => {
            require_options(&raw.options)?;
            let correct = expect_string_set(&correct)?;
            if correct.is_empty() {
                return Err("checkbox correct answer must name at least one option".to_string());
            }
            if let Some(stray) = correct.iter().find(|value| !raw.options.contains(*value)) {
                return Err(format!("correct answer {:?} is not one of the options", stray));
            }
            QuestionKind::Checkbox {
                options: raw.options,
                correct,
            }
        }
        "number_input" | "NumberInput" => QuestionKind::NumberInput {
            correct: match &correct {
                Value::Number(number) => number.to_string(),
                Value::String(text) => text.clone(),
                other => return Err(format!("expected a number, found {}", other)),
            },
        },
        other => return Err(format!("unknown question type {:?}", other)),
    };

    Ok(Question::new(raw.text, kind))
}

fn parse_true_false(value: &Value) -> Result<String, String> {
    match value {
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        Value::String(text) if text == "True" || text == "False" => Ok(text.clone()),
        other => Err(format!("expected \"True\" or \"False\", found {}", other)),
    }
}

fn require_options(options: &[String]) -> Result<(), String> {
    if options.is_empty() {
        Err("options must not be empty".to_string())
    } else {
        Ok(())
    }
}

fn expect_string(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("expected a string, found {}", value))
}

fn expect_string_set(value: &Value) -> Result<BTreeSet<String>, String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected an array of strings, found {}", value))?;
    items.iter().map(expect_string).collect()
}
