use std::{collections::BTreeMap, time::Duration};

/// Handle returned by [`TimerService::schedule`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimerToken(pub u64);

/// What the scheduler should do when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wakeup {
    /// Apply the next step of the current run.
    Advance,
    /// Recompile and start a repeat sub-run.
    Repeat,
}

pub trait TimerService {
    fn schedule(&mut self, wakeup: Wakeup, delay: Duration) -> TimerToken;

    /// Idempotent: cancelling a fired or already cancelled token does nothing.
    fn cancel(&mut self, token: TimerToken);
}

/// Deterministic timer queue over a virtual clock.
///
/// Timers fire in due-time order; timers due at the same instant fire in the
/// order they were scheduled. The clock only moves when told to.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_token: u64,
    pending: BTreeMap<(Duration, u64), Wakeup>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    pub fn advance_by(&mut self, d: Duration) {
        self.now += d;
    }

    /// Remove and return the earliest timer that is due at the current time.
    pub fn pop_due(&mut self) -> Option<(TimerToken, Wakeup)> {
        let (&(due, token), _) = self.pending.iter().next()?;
        if due > self.now {
            return None;
        }
        let wakeup = self.pending.remove(&(due, token))?;
        Some((TimerToken(token), wakeup))
    }
}

impl TimerService for TimerQueue {
    fn schedule(&mut self, wakeup: Wakeup, delay: Duration) -> TimerToken {
        let token = self.next_token;
        self.next_token += 1;
        self.pending.insert((self.now + delay, token), wakeup);
        TimerToken(token)
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|&(_, t), _| t != token.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/timer.rs"]
mod tests;
