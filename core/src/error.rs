use alloc::string::String;
use core::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Palette must contain at least one symbol")]
    EmptyPalette,
    #[error("Palette contains duplicate symbol {0:?}")]
    DuplicateSymbol(String),
    #[error("Palette of {0} symbols does not fit the card id range")]
    PaletteTooLarge(usize),
    #[error("Deck is malformed: {0}")]
    MalformedDeck(&'static str),
}

pub type Result<T> = core::result::Result<T, GameError>;

/// Failure reported by a [`crate::ScoreStore`] backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
    #[error("Storage rejected the write: {0}")]
    Rejected(String),
}

/// Diagnostic surfaced when the best score could not be loaded or saved. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BestScoreError {
    #[error("Could not read best score")]
    Read(#[source] StoreError),
    #[error("Could not save best score")]
    Write(#[source] StoreError),
    #[error("Stored best score is not a move count")]
    Parse(#[from] ParseIntError),
}
