use alloc::vec::Vec;
use core::ops::Index;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::*;
pub use shuffle::*;

mod shuffle;

pub trait DeckGenerator {
    fn generate(self, palette: &Palette) -> Deck;
}

/// Validated set of distinct symbols, one per pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct Palette(Vec<Symbol>);

impl Palette {
    /// Largest palette whose cards still get distinct ids.
    pub const MAX_SYMBOLS: usize = (CardId::MAX as usize + 1) / 2;

    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self> {
        let symbols: Vec<Symbol> = symbols.into_iter().collect();

        if symbols.is_empty() {
            return Err(GameError::EmptyPalette);
        }
        if symbols.len() > Self::MAX_SYMBOLS {
            return Err(GameError::PaletteTooLarge(symbols.len()));
        }

        if let Some(duplicate) = first_duplicate(&symbols) {
            return Err(GameError::DuplicateSymbol(duplicate.as_str().into()));
        }

        Ok(Self(symbols))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }
}

fn first_duplicate(symbols: &[Symbol]) -> Option<&Symbol> {
    let mut seen = HashSet::with_capacity(symbols.len());
    symbols.iter().find(|&symbol| !seen.insert(symbol))
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.to_vec())
    }
}

impl TryFrom<Vec<Symbol>> for Palette {
    type Error = GameError;

    fn try_from(symbols: Vec<Symbol>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<Palette> for Vec<Symbol> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

/// Ordered sequence of cards as laid out on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Unshuffled deck where card `2k` and `2k + 1` carry symbol `k`.
    pub fn paired(palette: &Palette) -> Self {
        let cards = palette
            .symbols()
            .iter()
            .enumerate()
            .flat_map(|(index, symbol)| {
                let id = (index * 2) as CardId;
                [
                    Card::face_down(id, symbol.clone()),
                    Card::face_down(id + 1, symbol.clone()),
                ]
            })
            .collect();
        Self { cards }
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        let deck = Self { cards };
        deck.validate()?;
        Ok(deck)
    }

    /// Checks the pairing and id invariants of a deck.
    pub fn validate(&self) -> Result<()> {
        if self.cards.is_empty() {
            return Err(GameError::MalformedDeck("deck is empty"));
        }
        if self.cards.len() % 2 != 0 {
            return Err(GameError::MalformedDeck("odd number of cards"));
        }

        let mut ids = HashSet::with_capacity(self.cards.len());
        let mut symbol_counts: HashMap<&Symbol, usize> = HashMap::new();
        for card in &self.cards {
            if !ids.insert(card.id) {
                return Err(GameError::MalformedDeck("duplicate card id"));
            }
            let count = symbol_counts.entry(&card.symbol).or_default();
            *count += 1;
            if *count > 2 {
                return Err(GameError::MalformedDeck("symbol does not appear exactly twice"));
            }
        }

        if symbol_counts.values().any(|&count| count != 2) {
            return Err(GameError::MalformedDeck("symbol does not appear exactly twice"));
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }
}

impl Index<usize> for Deck {
    type Output = Card;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cards[index]
    }
}

/// Generator that keeps the paired order, useful for reproducible layouts.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OrderedDeckGenerator;

impl DeckGenerator for OrderedDeckGenerator {
    fn generate(self, palette: &Palette) -> Deck {
        Deck::paired(palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(values: &[&'static str]) -> Vec<Symbol> {
        values.iter().copied().map(Symbol::from_static).collect()
    }

    #[test]
    fn palette_rejects_empty_and_duplicates() {
        assert_eq!(Palette::new(Vec::new()), Err(GameError::EmptyPalette));
        assert_eq!(
            Palette::new(symbols(&["A", "B", "A"])),
            Err(GameError::DuplicateSymbol("A".into()))
        );
    }

    #[test]
    fn paired_deck_puts_partners_next_to_each_other() {
        let palette = Palette::new(symbols(&["A", "B", "C"])).unwrap();
        let deck = Deck::paired(&palette);

        assert_eq!(deck.len(), 6);
        assert_eq!(deck.pair_count(), 3);
        for k in 0..3 {
            assert_eq!(deck[2 * k].id as usize, 2 * k);
            assert!(deck[2 * k].pairs_with(&deck[2 * k + 1]));
        }
        deck.validate().unwrap();
    }

    #[test]
    fn validate_flags_broken_pairs() {
        let mut cards = Deck::paired(&Palette::new(symbols(&["A", "B"])).unwrap()).into_cards();
        cards[1].symbol = Symbol::from_static("B");

        assert_eq!(
            Deck::from_cards(cards.clone()),
            Err(GameError::MalformedDeck("symbol does not appear exactly twice"))
        );

        cards.pop();
        assert_eq!(
            Deck::from_cards(cards),
            Err(GameError::MalformedDeck("odd number of cards"))
        );
    }

    #[test]
    fn validate_rejects_symbol_repeated_hundreds_of_times() {
        let cards = (0..256)
            .map(|id| Card::face_down(id, Symbol::from_static("A")))
            .collect();

        assert_eq!(
            Deck::from_cards(cards),
            Err(GameError::MalformedDeck("symbol does not appear exactly twice"))
        );
    }

    #[test]
    fn palette_keeps_symbol_order() {
        let palette = Palette::new(symbols(&["C", "A", "B"])).unwrap();
        assert_eq!(palette.symbols(), symbols(&["C", "A", "B"]).as_slice());
    }

    #[test]
    fn palette_round_trips_through_serde_validation() {
        let json = serde_json::to_string(&Palette::default()).unwrap();
        let palette: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(palette.len(), 8);

        assert!(serde_json::from_str::<Palette>(r#"["A","A"]"#).is_err());
    }
}
