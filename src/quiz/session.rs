//! The quiz session state machine.
//!
//! A session walks a fixed question sequence once. Each valid submission is
//! scored, recorded, and advances the index; the session finishes when the
//! sequence is exhausted or the timer expires, and never leaves `Finished`.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, info};

use super::validator::is_correct;
use crate::models::{Answer, AnsweredRecord, Question, QuestionKind, RawAnswer};
use crate::store::{ScoreStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("please answer the question before continuing")]
    EmptySubmission,
    #[error("this answer does not fit a {expected} question")]
    MismatchedAnswer { expected: &'static str },
    #[error("the quiz is over; there is no current question")]
    NoCurrentQuestion,
    #[error("the quiz has not finished yet")]
    NotFinished,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Whether the presenter should simply re-prompt.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::EmptySubmission | SessionError::MismatchedAnswer { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active(usize),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub correct: bool,
    /// Index of the question that was just answered.
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub total: u32,
    pub high_score: u32,
    /// The score beat the high score stored before this session.
    pub new_high_score: bool,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    records: Vec<AnsweredRecord>,
    expired: bool,
}

impl QuizSession {
    /// Start a session over `questions` in the order given.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            records: Vec::new(),
            expired: false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.is_finished() {
            SessionState::Finished
        } else {
            SessionState::Active(self.current_index)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.expired || self.current_index >= self.questions.len()
    }

    pub fn was_expired(&self) -> bool {
        self.expired
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn records(&self) -> &[AnsweredRecord] {
        &self.records
    }

    pub fn current_question(&self) -> Result<&Question, SessionError> {
        match self.state() {
            SessionState::Active(index) => Ok(&self.questions[index]),
            SessionState::Finished => Err(SessionError::NoCurrentQuestion),
        }
    }

    /// Score `raw` against the current question and move on.
    ///
    /// Empty or wrong-shaped input leaves the session untouched.
    pub fn submit_answer(&mut self, raw: RawAnswer) -> Result<SubmitOutcome, SessionError> {
        let question = self.current_question()?;
        if raw.is_empty() {
            return Err(SessionError::EmptySubmission);
        }

        let answer = normalize(question, raw)?;
        let correct = is_correct(question, &answer);
        let record = AnsweredRecord {
            question: question.text.clone(),
            user_answer: answer,
            correct_answer: question.correct_answer(),
            is_correct: correct,
        };

        let index = self.current_index;
        self.records.push(record);
        if correct {
            self.score += 1;
        }
        self.current_index += 1;

        debug!(index, correct, score = self.score, "answer submitted");
        Ok(SubmitOutcome { correct, index })
    }

    /// Finish now, whatever is left unanswered.
    pub fn expire(&mut self) {
        if self.is_finished() {
            return;
        }
        self.expired = true;
        info!(
            answered = self.current_index,
            total = self.questions.len(),
            "session expired"
        );
    }

    /// Settle the high score in `store` and report the result.
    pub fn finalize<S: ScoreStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<FinalScore, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }

        let stored = store.high_score()?;
        let new_high_score = self.score > stored;
        if new_high_score {
            store.set_high_score(self.score)?;
        }

        Ok(FinalScore {
            score: self.score,
            total: self.questions.len() as u32,
            high_score: self.score.max(stored),
            new_high_score,
        })
    }
}

/// Convert presenter input into the shape `question` compares against.
fn normalize(question: &Question, raw: RawAnswer) -> Result<Answer, SessionError> {
    let mismatch = || SessionError::MismatchedAnswer {
        expected: question.kind_label(),
    };

    match (&question.kind, raw) {
        (QuestionKind::Checkbox { .. }, RawAnswer::Checked(values)) => {
            Ok(Answer::Set(values.into_iter().collect::<BTreeSet<_>>()))
        }
        (QuestionKind::Checkbox { .. }, _) => Err(mismatch()),
        (
            QuestionKind::NumberInput { .. },
            RawAnswer::Text(text) | RawAnswer::Choice(Some(text)),
        ) => Ok(Answer::Single(text.trim().to_string())),
        (
            QuestionKind::TrueFalse { .. } | QuestionKind::MultipleChoice { .. },
            RawAnswer::Choice(Some(value)) | RawAnswer::Text(value),
        ) => Ok(Answer::Single(value)),
        _ => Err(mismatch()),
    }
}
