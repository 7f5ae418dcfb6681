use std::collections::BTreeSet;

use crate::models::{AnsweredRecord, AppState, Question, RawAnswer};
use crate::quiz::{FinalScore, Presenter, SessionError};

/// Terminal-side view of a quiz.
///
/// Holds only what is on screen and what the user has typed or marked; all
/// scoring happens in the controller.
pub struct App {
    pub state: AppState,
    question: Option<Question>,
    question_index: usize,
    total_questions: usize,
    time_limit_secs: u32,
    seconds_left: u32,
    cursor: usize,
    marked: BTreeSet<usize>,
    text_input: String,
    feedback: Option<bool>,
    notice: Option<String>,
    result: Option<FinalScore>,
    records: Vec<AnsweredRecord>,
    result_scroll: usize,
}

impl App {
    pub fn new(total_questions: usize, time_limit_secs: u32) -> Self {
        Self {
            state: AppState::Welcome,
            question: None,
            question_index: 0,
            total_questions,
            time_limit_secs,
            seconds_left: time_limit_secs,
            cursor: 0,
            marked: BTreeSet::new(),
            text_input: String::new(),
            feedback: None,
            notice: None,
            result: None,
            records: Vec::new(),
            result_scroll: 0,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn current_question_number(&self) -> usize {
        self.question_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    /// `Some(correct)` while the last answer is being shown as right or wrong.
    pub fn feedback(&self) -> Option<bool> {
        self.feedback
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn result(&self) -> Option<&FinalScore> {
        self.result.as_ref()
    }

    pub fn records(&self) -> &[AnsweredRecord] {
        &self.records
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn is_text_entry(&self) -> bool {
        self.question.as_ref().is_some_and(Question::is_free_text)
    }

    fn choice_count(&self) -> usize {
        self.question.as_ref().map_or(0, |q| q.choices().len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.choice_count();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.choice_count();
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
    }

    /// Mark the option under the cursor: toggles for checkboxes, replaces the
    /// selection for radio groups.
    pub fn toggle_mark(&mut self) {
        let Some(question) = &self.question else {
            return;
        };
        if question.choices().is_empty() {
            return;
        }
        self.notice = None;
        if question.is_multi_select() {
            if !self.marked.remove(&self.cursor) {
                self.marked.insert(self.cursor);
            }
        } else {
            self.marked.clear();
            self.marked.insert(self.cursor);
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.notice = None;
        self.text_input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.text_input.pop();
    }

    /// What the user has entered for the current question, as raw input.
    pub fn build_answer(&self) -> RawAnswer {
        let Some(question) = &self.question else {
            return RawAnswer::Choice(None);
        };
        if question.is_free_text() {
            return RawAnswer::Text(self.text_input.clone());
        }

        let choices = question.choices();
        let mut values = self
            .marked
            .iter()
            .filter_map(|&index| choices.get(index))
            .map(|value| value.to_string());

        if question.is_multi_select() {
            RawAnswer::Checked(values.collect())
        } else {
            RawAnswer::Choice(values.next())
        }
    }

    pub fn scroll_results_down(&mut self) {
        if self.result_scroll + 1 < self.records.len() {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }
}

impl Presenter for App {
    fn question_changed(&mut self, question: &Question, index: usize, total: usize) {
        self.state = AppState::Quiz;
        self.question = Some(question.clone());
        self.question_index = index;
        self.total_questions = total;
        self.cursor = 0;
        self.marked.clear();
        self.text_input.clear();
        self.feedback = None;
        self.notice = None;
    }

    fn timer_tick(&mut self, seconds_left: u32) {
        self.seconds_left = seconds_left;
    }

    fn answer_checked(&mut self, correct: bool) {
        self.feedback = Some(correct);
        self.notice = None;
    }

    fn rejected_submission(&mut self, reason: &SessionError) {
        self.notice = Some(reason.to_string());
    }

    fn finished(&mut self, result: &FinalScore, records: &[AnsweredRecord]) {
        self.state = AppState::Result;
        self.question = None;
        self.feedback = None;
        self.notice = None;
        self.result = Some(*result);
        self.records = records.to_vec();
        self.result_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn checkbox() -> Question {
        Question::new(
            "Pick vowels",
            QuestionKind::Checkbox {
                options: vec!["a".into(), "b".into(), "e".into()],
                correct: ["a".to_string(), "e".to_string()].into(),
            },
        )
    }

    fn multiple_choice() -> Question {
        Question::new(
            "Pick b",
            QuestionKind::MultipleChoice {
                options: vec!["a".into(), "b".into(), "c".into()],
                correct: "b".to_string(),
            },
        )
    }

    #[test]
    fn test_nothing_marked_builds_empty_answer() {
        let mut app = App::new(1, 60);
        app.question_changed(&multiple_choice(), 0, 1);
        assert_eq!(app.build_answer(), RawAnswer::Choice(None));
        assert!(app.build_answer().is_empty());
    }

    #[test]
    fn test_radio_keeps_single_mark() {
        let mut app = App::new(1, 60);
        app.question_changed(&multiple_choice(), 0, 1);
        app.toggle_mark();
        app.select_next_option();
        app.toggle_mark();
        assert_eq!(app.build_answer(), RawAnswer::Choice(Some("b".into())));
    }

    #[test]
    fn test_checkboxes_toggle() {
        let mut app = App::new(1, 60);
        app.question_changed(&checkbox(), 0, 1);
        app.toggle_mark();
        app.select_previous_option();
        app.toggle_mark();
        app.select_next_option();
        app.select_next_option();
        app.toggle_mark();
        app.toggle_mark();
        assert_eq!(
            app.build_answer(),
            RawAnswer::Checked(vec!["a".into(), "e".into()])
        );
    }

    #[test]
    fn test_text_entry_for_numbers() {
        let mut app = App::new(1, 60);
        let question = Question::new(
            "6 * 7",
            QuestionKind::NumberInput {
                correct: "42".into(),
            },
        );
        app.question_changed(&question, 0, 1);
        assert!(app.is_text_entry());
        app.push_char('4');
        app.push_char('3');
        app.pop_char();
        app.push_char('2');
        assert_eq!(app.build_answer(), RawAnswer::Text("42".into()));
    }

    #[test]
    fn test_rejection_then_new_question_clears_notice() {
        let mut app = App::new(2, 60);
        app.question_changed(&multiple_choice(), 0, 2);
        app.rejected_submission(&SessionError::EmptySubmission);
        assert!(app.notice().is_some());

        app.answer_checked(true);
        assert_eq!(app.feedback(), Some(true));
        app.question_changed(&checkbox(), 1, 2);
        assert_eq!(app.notice(), None);
        assert_eq!(app.feedback(), None);
        assert_eq!(app.current_question_number(), 2);
    }

    #[test]
    fn test_finished_switches_to_results() {
        let mut app = App::new(1, 60);
        let result = FinalScore {
            score: 1,
            total: 1,
            high_score: 3,
            new_high_score: false,
        };
        app.finished(&result, &[]);
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.result(), Some(&result));
    }
}
