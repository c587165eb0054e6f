use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

/// External key-value storage for records that outlive the engine.
pub trait ScoreStore {
    fn get(&self, key: &str) -> core::result::Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> core::result::Result<(), StoreError>;
}

/// In-process store for headless hosts and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> core::result::Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> core::result::Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Lowest move count over all completed games, if any game was completed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScore(Option<MoveCount>);

impl BestScore {
    pub const fn none() -> Self {
        Self(None)
    }

    pub const fn of(moves: MoveCount) -> Self {
        Self(Some(moves))
    }

    pub const fn get(self) -> Option<MoveCount> {
        self.0
    }

    /// Strictly fewer moves than the record, or no record yet.
    pub const fn is_beaten_by(self, moves: MoveCount) -> bool {
        match self.0 {
            None => true,
            Some(best) => moves < best,
        }
    }

    pub fn load(store: &impl ScoreStore, key: &str) -> core::result::Result<Self, BestScoreError> {
        let Some(raw) = store.get(key).map_err(BestScoreError::Read)? else {
            return Ok(Self::none());
        };
        let moves = raw.trim().parse::<MoveCount>()?;
        Ok(Self::of(moves))
    }

    /// Writes `moves` as a base-10 string, replacing whatever was stored.
    pub fn save(
        store: &mut impl ScoreStore,
        key: &str,
        moves: MoveCount,
    ) -> core::result::Result<(), BestScoreError> {
        store
            .set(key, &moves.to_string())
            .map_err(BestScoreError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "@memo_bits_best_score";

    #[test]
    fn absent_key_means_no_record() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store, KEY), Ok(BestScore::none()));
    }

    #[test]
    fn stored_value_is_parsed_as_base_ten() {
        let store = MemoryStore::new().with_entry(KEY, " 12\n");
        assert_eq!(BestScore::load(&store, KEY), Ok(BestScore::of(12)));
    }

    #[test]
    fn corrupt_value_is_a_parse_diagnostic() {
        let store = MemoryStore::new().with_entry(KEY, "twelve");
        assert!(matches!(
            BestScore::load(&store, KEY),
            Err(BestScoreError::Parse(_))
        ));

        let store = MemoryStore::new().with_entry(KEY, "-3");
        assert!(BestScore::load(&store, KEY).is_err());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let mut store = MemoryStore::new().with_entry(KEY, "20");
        BestScore::save(&mut store, KEY, 11).unwrap();
        assert_eq!(store.entry(KEY), Some("11"));
    }

    #[test]
    fn only_strictly_lower_counts_beat_the_record() {
        assert!(BestScore::none().is_beaten_by(u32::MAX));
        assert!(BestScore::of(10).is_beaten_by(9));
        assert!(!BestScore::of(10).is_beaten_by(10));
        assert!(!BestScore::of(10).is_beaten_by(11));
    }
}
