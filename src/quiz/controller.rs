//! Drives one quiz at a time for a presenter.
//!
//! The controller is the only owner of the session, its timer and the store.
//! Timer ticks and the post-answer pause are produced on other tasks but only
//! ever reach the session as `ControlEvent`s through the controller's
//! channel, so they are applied one at a time alongside user input.

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::presenter::Presenter;
use super::session::{FinalScore, QuizSession};
use crate::config::Timing;
use crate::data::QuestionBank;
use crate::models::RawAnswer;
use crate::store::{KeyValueStore, save_answer_log};
use crate::timer::{Timer, TimerEvent};

/// Work scheduled by the controller for itself.
///
/// `generation` identifies the session the event belongs to; events from a
/// discarded session are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Timer { generation: u64, event: TimerEvent },
    Advance { generation: u64 },
}

pub struct QuizController<S> {
    bank: QuestionBank,
    store: S,
    timing: Timing,
    events: mpsc::UnboundedSender<ControlEvent>,
    generation: u64,
    session: Option<QuizSession>,
    timer: Option<Timer>,
    awaiting_advance: bool,
    result: Option<FinalScore>,
}

impl<S: KeyValueStore> QuizController<S> {
    pub fn new(
        bank: QuestionBank,
        store: S,
        timing: Timing,
        events: mpsc::UnboundedSender<ControlEvent>,
    ) -> Self {
        Self {
            bank,
            store,
            timing,
            events,
            generation: 0,
            session: None,
            timer: None,
            awaiting_advance: false,
            result: None,
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The result of the current session, once it has finished.
    pub fn result(&self) -> Option<&FinalScore> {
        self.result.as_ref()
    }

    pub fn is_awaiting_advance(&self) -> bool {
        self.awaiting_advance
    }

    /// Begin a fresh session: new shuffle, full timer.
    pub fn start<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        self.timer = None;
        self.generation += 1;
        self.awaiting_advance = false;
        self.result = None;

        let session = QuizSession::new(self.bank.shuffled());
        info!(
            generation = self.generation,
            questions = session.total(),
            time_limit = self.timing.time_limit_secs,
            "quiz started"
        );
        self.session = Some(session);

        let generation = self.generation;
        let events = self.events.clone();
        self.timer = Some(Timer::start(
            self.timing.time_limit_secs,
            self.timing.tick_period,
            move |event| {
                let _ = events.send(ControlEvent::Timer { generation, event });
            },
        ));

        presenter.timer_tick(self.timing.time_limit_secs);
        self.show_current(presenter);
    }

    /// Throw the current session away and start over.
    pub fn restart<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        debug!(generation = self.generation, "restart requested");
        self.start(presenter);
    }

    pub fn submit<P: Presenter + ?Sized>(&mut self, raw: RawAnswer, presenter: &mut P) {
        if self.awaiting_advance || self.result.is_some() {
            debug!("submission ignored while not accepting answers");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            warn!("submission before the quiz started");
            return;
        };

        let outcome = match session.submit_answer(raw) {
            Ok(outcome) => outcome,
            Err(err) if err.is_recoverable() => {
                presenter.rejected_submission(&err);
                return;
            }
            Err(err) => {
                error!(error = %err, "submission rejected");
                return;
            }
        };

        if session.is_finished() {
            self.timer = None;
        }
        self.awaiting_advance = true;
        presenter.answer_checked(outcome.correct);
        self.schedule_advance();
    }

    pub fn handle_event<P: Presenter + ?Sized>(&mut self, event: ControlEvent, presenter: &mut P) {
        match event {
            ControlEvent::Timer { generation, .. } | ControlEvent::Advance { generation }
                if generation != self.generation =>
            {
                debug!(generation, current = self.generation, "stale event dropped");
            }
            ControlEvent::Timer {
                event: TimerEvent::Tick { seconds_left },
                ..
            } => {
                if self.result.is_none() {
                    presenter.timer_tick(seconds_left);
                }
            }
            ControlEvent::Timer {
                event: TimerEvent::Expired,
                ..
            } => {
                if let Some(session) = self.session.as_mut() {
                    session.expire();
                }
                self.finish(presenter);
            }
            ControlEvent::Advance { .. } => {
                self.awaiting_advance = false;
                let finished = self.session.as_ref().is_none_or(QuizSession::is_finished);
                if finished {
                    self.finish(presenter);
                } else {
                    self.show_current(presenter);
                }
            }
        }
    }

    fn schedule_advance(&self) {
        let delay = self.timing.feedback_delay;
        let generation = self.generation;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(ControlEvent::Advance { generation });
        });
    }

    fn show_current<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if let Ok(question) = session.current_question() {
            presenter.question_changed(question, session.current_index(), session.total());
            return;
        }
        self.finish(presenter);
    }

    /// Settle the finished session. Runs once per session.
    fn finish<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        if self.result.is_some() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.timer = None;

        let result = match session.finalize(&mut self.store) {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err, "could not settle the high score");
                FinalScore {
                    score: session.score(),
                    total: session.total() as u32,
                    high_score: session.score(),
                    new_high_score: false,
                }
            }
        };
        if let Err(err) = save_answer_log(&mut self.store, session.records()) {
            warn!(error = %err, "could not save the answer log");
        }

        info!(
            score = result.score,
            total = result.total,
            high_score = result.high_score,
            expired = session.was_expired(),
            "quiz finished"
        );
        presenter.finished(&result, session.records());
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::models::{AnsweredRecord, Question, QuestionKind};
    use crate::quiz::SessionError;
    use crate::store::{MemoryStore, ScoreStore, StoreError, load_answer_log};

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Question(String, usize),
        Tick(u32),
        Checked(bool),
        Rejected(String),
        Finished(FinalScore, usize),
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Seen>,
    }

    impl Recorder {
        fn finishes(&self) -> Vec<&Seen> {
            self.seen
                .iter()
                .filter(|s| matches!(s, Seen::Finished(..)))
                .collect()
        }
    }

    impl Presenter for Recorder {
        fn question_changed(&mut self, question: &Question, index: usize, _total: usize) {
            self.seen.push(Seen::Question(question.text.clone(), index));
        }

        fn timer_tick(&mut self, seconds_left: u32) {
            self.seen.push(Seen::Tick(seconds_left));
        }

        fn answer_checked(&mut self, correct: bool) {
            self.seen.push(Seen::Checked(correct));
        }

        fn rejected_submission(&mut self, reason: &SessionError) {
            self.seen.push(Seen::Rejected(reason.to_string()));
        }

        fn finished(&mut self, result: &FinalScore, records: &[AnsweredRecord]) {
            self.seen.push(Seen::Finished(*result, records.len()));
        }
    }

    fn true_false_bank(count: usize) -> QuestionBank {
        let questions = (0..count)
            .map(|n| {
                Question::new(
                    format!("statement {n}"),
                    QuestionKind::TrueFalse {
                        correct: "True".to_string(),
                    },
                )
            })
            .collect();
        QuestionBank::from_questions(questions).unwrap()
    }

    fn timing(seconds: u32) -> Timing {
        Timing {
            time_limit_secs: seconds,
            tick_period: Duration::from_secs(1),
            feedback_delay: Duration::from_millis(500),
        }
    }

    fn controller(
        count: usize,
        seconds: u32,
    ) -> (
        QuizController<MemoryStore>,
        mpsc::UnboundedReceiver<ControlEvent>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            QuizController::new(true_false_bank(count), MemoryStore::new(), timing(seconds), tx),
            rx,
        )
    }

    /// Every read and write fails, like a store on a full or read-only disk.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io {
                path: PathBuf::from("store.json"),
                source: io::Error::other("disk unavailable"),
            })
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: PathBuf::from("store.json"),
                source: io::Error::other("disk unavailable"),
            })
        }
    }

    fn answer(value: &str) -> RawAnswer {
        RawAnswer::Choice(Some(value.to_string()))
    }

    /// Feed events back until the pending advance has been applied.
    async fn pump_until_advanced<S: KeyValueStore>(
        controller: &mut QuizController<S>,
        rx: &mut mpsc::UnboundedReceiver<ControlEvent>,
        presenter: &mut Recorder,
    ) {
        while controller.is_awaiting_advance() {
            let event = rx.recv().await.unwrap();
            controller.handle_event(event, presenter);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_finishes_once_and_saves() {
        let (mut controller, mut rx) = controller(2, 60);
        let mut presenter = Recorder::default();

        controller.start(&mut presenter);
        assert_eq!(presenter.seen[0], Seen::Tick(60));
        assert!(matches!(presenter.seen[1], Seen::Question(_, 0)));

        controller.submit(answer("True"), &mut presenter);
        pump_until_advanced(&mut controller, &mut rx, &mut presenter).await;
        controller.submit(answer("False"), &mut presenter);
        pump_until_advanced(&mut controller, &mut rx, &mut presenter).await;

        let expected = FinalScore {
            score: 1,
            total: 2,
            high_score: 1,
            new_high_score: true,
        };
        assert_eq!(controller.result(), Some(&expected));
        assert_eq!(presenter.finishes(), vec![&Seen::Finished(expected, 2)]);
        assert_eq!(controller.store().high_score().unwrap(), 1);
        assert_eq!(load_answer_log(controller.store()).unwrap().len(), 2);

        // The timer was stopped on the last answer; nothing else arrives.
        tokio::time::sleep(Duration::from_secs(120)).await;
        while let Ok(event) = rx.try_recv() {
            controller.handle_event(event, &mut presenter);
        }
        assert_eq!(presenter.finishes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_submission_is_rejected_without_advancing() {
        let (mut controller, _rx) = controller(2, 60);
        let mut presenter = Recorder::default();
        controller.start(&mut presenter);

        controller.submit(RawAnswer::Choice(None), &mut presenter);
        assert!(matches!(presenter.seen.last(), Some(Seen::Rejected(_))));
        assert!(!controller.is_awaiting_advance());
        assert_eq!(controller.session().unwrap().current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submissions_during_feedback_are_ignored() {
        let (mut controller, _rx) = controller(3, 60);
        let mut presenter = Recorder::default();
        controller.start(&mut presenter);

        controller.submit(answer("True"), &mut presenter);
        controller.submit(answer("True"), &mut presenter);
        assert_eq!(controller.session().unwrap().current_index(), 1);
        assert_eq!(
            presenter
                .seen
                .iter()
                .filter(|s| matches!(s, Seen::Checked(_)))
                .count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_finishes_with_questions_left() {
        let (mut controller, mut rx) = controller(3, 2);
        let mut presenter = Recorder::default();
        controller.start(&mut presenter);

        while controller.result().is_none() {
            let event = rx.recv().await.unwrap();
            controller.handle_event(event, &mut presenter);
        }

        let session = controller.session().unwrap();
        assert!(session.was_expired());
        assert_eq!(session.current_index(), 0);
        assert!(presenter.seen.contains(&Seen::Tick(1)));
        assert!(presenter.seen.contains(&Seen::Tick(0)));
        assert_eq!(
            presenter.finishes(),
            vec![&Seen::Finished(
                FinalScore {
                    score: 0,
                    total: 3,
                    high_score: 0,
                    new_high_score: false,
                },
                0
            )]
        );

        controller.submit(answer("True"), &mut presenter);
        assert_eq!(controller.session().unwrap().current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_drops_stale_events() {
        let (mut controller, mut rx) = controller(2, 60);
        let mut presenter = Recorder::default();
        controller.start(&mut presenter);
        controller.submit(answer("True"), &mut presenter);

        controller.restart(&mut presenter);
        assert!(!controller.is_awaiting_advance());
        assert_eq!(controller.session().unwrap().current_index(), 0);

        // The old advance is still delivered, but must not move the new session.
        let stale = rx.recv().await.unwrap();
        assert_eq!(stale, ControlEvent::Advance { generation: 1 });
        let before = presenter.seen.len();
        controller.handle_event(stale, &mut presenter);
        assert_eq!(presenter.seen.len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_high_score_is_kept_across_sessions() {
        let (mut controller, mut rx) = controller(1, 60);
        let mut presenter = Recorder::default();

        controller.start(&mut presenter);
        controller.submit(answer("True"), &mut presenter);
        pump_until_advanced(&mut controller, &mut rx, &mut presenter).await;
        assert_eq!(controller.result().unwrap().high_score, 1);

        controller.restart(&mut presenter);
        controller.submit(answer("False"), &mut presenter);
        pump_until_advanced(&mut controller, &mut rx, &mut presenter).await;
        assert_eq!(
            controller.result(),
            Some(&FinalScore {
                score: 0,
                total: 1,
                high_score: 1,
                new_high_score: false,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_falls_back_to_session_score() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut controller = QuizController::new(true_false_bank(1), FailingStore, timing(60), tx);
        let mut presenter = Recorder::default();

        controller.start(&mut presenter);
        controller.submit(answer("True"), &mut presenter);
        pump_until_advanced(&mut controller, &mut rx, &mut presenter).await;

        let expected = FinalScore {
            score: 1,
            total: 1,
            high_score: 1,
            new_high_score: false,
        };
        assert_eq!(controller.result(), Some(&expected));
        assert_eq!(presenter.finishes(), vec![&Seen::Finished(expected, 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_runs_a_full_length_timer() {
        let (mut controller, mut rx) = controller(2, 60);
        let mut presenter = Recorder::default();
        controller.start(&mut presenter);

        while !presenter.seen.contains(&Seen::Tick(30)) {
            let event = rx.recv().await.unwrap();
            controller.handle_event(event, &mut presenter);
        }

        let restarted_at = tokio::time::Instant::now();
        let before = presenter.seen.len();
        controller.restart(&mut presenter);

        loop {
            let event = rx.recv().await.unwrap();
            let fresh = matches!(event, ControlEvent::Timer { generation: 2, .. });
            controller.handle_event(event, &mut presenter);
            if fresh {
                break;
            }
        }

        let ticks: Vec<_> = presenter.seen[before..]
            .iter()
            .filter(|s| matches!(s, Seen::Tick(_)))
            .collect();
        assert_eq!(ticks, vec![&Seen::Tick(60), &Seen::Tick(59)]);
        assert!(restarted_at.elapsed() >= Duration::from_secs(1));
        assert_eq!(controller.session().unwrap().current_index(), 0);
    }
}
