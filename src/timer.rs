//! Quiz countdown.
//!
//! `Countdown` is the arithmetic; `Timer` drives one on a tokio task and is
//! cancelled when dropped, so a discarded session can never expire late.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { seconds_left: u32 },
    /// Sent once, right after the tick that reaches zero.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Take one second off. Returns the new remaining time, or `None` once
    /// the countdown had already run out.
    pub fn tick(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.remaining)
    }
}

/// A running countdown. Dropping it stops it.
#[derive(Debug)]
pub struct Timer {
    handle: JoinHandle<()>,
}

impl Timer {
    /// Count down from `seconds`, one step per `period`, reporting to `sink`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(seconds: u32, period: Duration, mut sink: F) -> Self
    where
        F: FnMut(TimerEvent) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut countdown = Countdown::new(seconds);
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while !countdown.is_expired() {
                interval.tick().await;
                if let Some(seconds_left) = countdown.tick() {
                    sink(TimerEvent::Tick { seconds_left });
                }
            }
            sink(TimerEvent::Expired);
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("timer cancelled");
        }
        self.handle.abort();
    }
}
