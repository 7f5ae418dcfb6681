use crate::models::{AnsweredRecord, Question};

use super::session::{FinalScore, SessionError};

/// What a front end is told as a quiz runs.
///
/// The controller calls these; nothing in the session depends on how they
/// are rendered.
pub trait Presenter {
    /// A new question is up. `index` is 0-based.
    fn question_changed(&mut self, question: &Question, index: usize, total: usize);

    fn timer_tick(&mut self, seconds_left: u32);

    /// The submitted answer was scored; the next question follows after the
    /// feedback delay.
    fn answer_checked(&mut self, correct: bool);

    /// The submission was refused and the same question is still current.
    fn rejected_submission(&mut self, reason: &SessionError);

    fn finished(&mut self, result: &FinalScore, records: &[AnsweredRecord]);
}
