//! # timed-quiz
//!
//! A timed, single-player terminal quiz: true/false, multiple choice,
//! select-all and numeric questions, a countdown, and a persisted high score.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timed_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Load questions from a JSON file
//!     let quiz = Quiz::from_config(QuizConfig::new("questions.json"))?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The session logic in [`quiz`] has no terminal dependency; any front end
//! that implements [`Presenter`] can drive a [`QuizController`].

mod app;
pub mod config;
mod data;
pub mod logging;
mod models;
pub mod quiz;
pub mod store;
pub mod terminal;
pub mod timer;
mod ui;

use std::io;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::info;

pub use app::App;
pub use config::{ConfigError, QuizConfig, Timing};
pub use data::{LoadError, QuestionBank, shuffle};
pub use models::{Answer, AnsweredRecord, AppState, Question, QuestionKind, RawAnswer, RawQuestion};
pub use quiz::{
    ControlEvent, FinalScore, Presenter, QuizController, QuizSession, SessionError, SessionState,
    SubmitOutcome,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, ScoreStore, StoreError};
pub use timer::{Countdown, Timer, TimerEvent};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("cannot load quiz: {0}")]
    Load(#[from] LoadError),
    /// The persistent store could not be opened.
    #[error("cannot open score store: {0}")]
    Store(#[from] StoreError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz that can be run in the terminal.
pub struct Quiz {
    bank: QuestionBank,
    store: FileStore,
    timing: Timing,
}

impl Quiz {
    pub fn new(bank: QuestionBank, store: FileStore, timing: Timing) -> Result<Self, QuizError> {
        timing.validate()?;
        Ok(Self {
            bank,
            store,
            timing,
        })
    }

    /// Load the questions and open the store named in `config`.
    ///
    /// A damaged store file does not stop the quiz; it is set aside and the
    /// high score starts again from zero.
    pub fn from_config(config: QuizConfig) -> Result<Self, QuizError> {
        let bank = QuestionBank::from_json_file(&config.questions_path)?;
        let store = FileStore::open_or_reset(&config.store_path)?;
        info!(
            questions = bank.len(),
            store = %store.path().display(),
            "quiz loaded"
        );
        Self::new(bank, store, config.timing)
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, self).await;
        terminal::restore()?;
        result
    }
}

/// What a key press asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    None,
    Start,
    Submit(RawAnswer),
    Restart,
    Quit,
}

async fn run_event_loop(terminal: &mut terminal::AppTerminal, quiz: Quiz) -> Result<(), QuizError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(quiz.bank.len(), quiz.timing.time_limit_secs);
    let mut controller = QuizController::new(quiz.bank, quiz.store, quiz.timing, tx);
    let mut keys = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        tokio::select! {
            Some(event) = keys.next() => {
                let Event::Key(key) = event? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_input(&mut app, key.code) {
                    Action::None => {}
                    Action::Start => controller.start(&mut app),
                    Action::Submit(raw) => controller.submit(raw, &mut app),
                    Action::Restart => controller.restart(&mut app),
                    Action::Quit => break,
                }
            }
            Some(event) = rx.recv() => {
                controller.handle_event(event, &mut app);
            }
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) -> Action {
    match app.state {
        AppState::Welcome => handle_welcome_input(key),
        AppState::Quiz if app.is_text_entry() => handle_text_input(app, key),
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input(key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => Action::Start,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            Action::None
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            app.toggle_mark();
            Action::None
        }
        KeyCode::Enter => Action::Submit(app.build_answer()),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

fn handle_text_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Char(c) => {
            app.push_char(c);
            Action::None
        }
        KeyCode::Backspace => {
            app.pop_char();
            Action::None
        }
        KeyCode::Enter => Action::Submit(app.build_answer()),
        KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            Action::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            Action::None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}
