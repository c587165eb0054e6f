use alloc::borrow::Cow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Identifier of a single card, unique and stable for one deal.
pub type CardId = u16;

/// Count type used for resolved pairs.
pub type MoveCount = u32;

/// Opaque face value shared by exactly two cards of a deck.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(Cow<'static, str>);

impl Symbol {
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Symbol {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<alloc::string::String> for Symbol {
    fn from(value: alloc::string::String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default face values, one per pair.
pub const DEFAULT_PALETTE: [Symbol; 8] = [
    Symbol::from_static("🎮"),
    Symbol::from_static("🚀"),
    Symbol::from_static("💾"),
    Symbol::from_static("🐛"),
    Symbol::from_static("🎯"),
    Symbol::from_static("🎨"),
    Symbol::from_static("🎵"),
    Symbol::from_static("🔥"),
];
