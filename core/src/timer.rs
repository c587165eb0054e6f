use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Named purpose of a pending engine timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerRole {
    /// Flips a mismatched pair back face-down.
    Settle,
    /// Declares the game won once the final match has been shown.
    WinReveal,
}

impl fmt::Display for TimerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Settle => "settle",
            Self::WinReveal => "win-reveal",
        })
    }
}

/// Single-slot scheduled task: at most one deadline is pending, scheduling again replaces it.
///
/// The slot only remembers when to fire. What firing means is decided by the owner from its state at that moment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSlot {
    deadline: Option<Duration>,
}

impl TimerSlot {
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    pub fn schedule(&mut self, at: Duration) {
        self.deadline = Some(at);
    }

    /// Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    /// Clears the slot and reports `true` when its deadline has been reached.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
