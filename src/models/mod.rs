mod answer;
mod question;

pub use answer::{Answer, AnsweredRecord, RawAnswer};
pub use question::{Question, QuestionKind, RawQuestion};

/// Which screen the terminal presenter is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Quiz,
    Result,
}
