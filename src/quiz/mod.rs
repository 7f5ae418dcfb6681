//! Session logic: validation, the session state machine, and the controller
//! that connects it to a timer, a store and a presenter.

mod controller;
mod presenter;
mod session;
mod validator;

pub use controller::{ControlEvent, QuizController};
pub use presenter::Presenter;
pub use session::{FinalScore, QuizSession, SessionError, SessionState, SubmitOutcome};
pub use validator::{is_correct, parse_number};
