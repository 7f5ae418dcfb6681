use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::store::FileStore;
use crate::timer::DEFAULT_TIME_LIMIT_SECS;

pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
    #[error("timer period must be greater than zero")]
    ZeroTickPeriod,
}

/// Session pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Countdown length, in ticks.
    pub time_limit_secs: u32,
    /// Wall-clock length of one tick.
    pub tick_period: Duration,
    /// Pause between checking an answer and showing the next question.
    pub feedback_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            tick_period: Duration::from_secs(1),
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}

impl Timing {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.tick_period.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        Ok(())
    }
}

/// Everything the binary needs to run a quiz.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub questions_path: PathBuf,
    pub store_path: PathBuf,
    pub timing: Timing,
}

impl QuizConfig {
    pub fn new(questions_path: impl Into<PathBuf>) -> Self {
        Self {
            questions_path: questions_path.into(),
            store_path: FileStore::default_path(),
            timing: Timing::default(),
        }
    }

    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }
}
