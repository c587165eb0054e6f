use serde::{Deserialize, Serialize};

use crate::*;

/// Canonical state of a single card stored by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub symbol: Symbol,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub const fn face_down(id: CardId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Matched cards always show their face, even if a renderer only looks at `is_flipped`.
    pub const fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }

    pub const fn is_selectable(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }

    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.symbol == other.symbol
    }
}
