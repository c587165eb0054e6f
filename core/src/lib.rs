#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

use alloc::borrow::Cow;
use core::ops::BitOr;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use score::*;
pub use timer::*;
pub use types::*;

mod card;
mod deck;
mod engine;
mod error;
mod score;
mod timer;
mod types;

/// Immutable settings the engine is constructed with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub palette: Palette,
    pub storage_key: Cow<'static, str>,
    pub settle_delay: Duration,
    pub win_reveal_delay: Duration,
}

impl EngineConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "@memo_bits_best_score";
    pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_WIN_REVEAL_DELAY: Duration = Duration::from_millis(500);

    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self> {
        Ok(Self {
            palette: Palette::new(symbols)?,
            ..Self::default()
        })
    }

    pub fn with_storage_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_win_reveal_delay(mut self, delay: Duration) -> Self {
        self.win_reveal_delay = delay;
        self
    }

    pub fn total_cards(&self) -> usize {
        self.palette.len() * 2
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            storage_key: Cow::Borrowed(Self::DEFAULT_STORAGE_KEY),
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            win_reveal_delay: Self::DEFAULT_WIN_REVEAL_DELAY,
        }
    }
}

/// Outcome of selecting a card
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    Flipped,
    Matched,
    Mismatched,
    /// The final pair was matched, the win is revealed after a delay.
    Completed,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Outcome of moving the engine clock forward
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    Settled,
    Won,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        use TickOutcome::*;
        match self {
            NoChange => false,
            Settled => true,
            Won => true,
        }
    }
}

impl BitOr for TickOutcome {
    type Output = TickOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use TickOutcome::*;
        match (self, rhs) {
            (Won, _) => Won,
            (_, Won) => Won,
            (Settled, _) => Settled,
            (_, Settled) => Settled,
            (NoChange, NoChange) => NoChange,
        }
    }
}
