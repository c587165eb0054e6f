use std::time::Duration;

use memo_bits_core::*;
use proptest::prelude::*;

fn abcd_config() -> EngineConfig {
    EngineConfig::new(["A", "B", "C", "D"].map(Symbol::from_static)).unwrap()
}

fn ids_of(engine: &MatchEngine, symbol: &str) -> (CardId, CardId) {
    let ids: Vec<CardId> = engine
        .cards()
        .iter()
        .filter(|card| card.symbol.as_str() == symbol)
        .map(|card| card.id)
        .collect();
    assert_eq!(ids.len(), 2, "symbol {symbol} must appear twice");
    (ids[0], ids[1])
}

#[test]
fn seeded_four_pair_game_end_to_end() {
    let mut engine = MatchEngine::new(abcd_config(), MemoryStore::new(), 2024);
    assert_eq!(engine.cards().len(), 8);

    let (a1, a2) = ids_of(&engine, "A");
    assert_eq!(engine.select_card(a1), SelectOutcome::Flipped);
    assert_eq!(engine.select_card(a2), SelectOutcome::Matched);
    assert_eq!(engine.moves(), 1);

    let (b1, _) = ids_of(&engine, "B");
    let (c1, _) = ids_of(&engine, "C");
    engine.select_card(b1);
    assert_eq!(engine.select_card(c1), SelectOutcome::Mismatched);
    assert_eq!(engine.moves(), 1);
    assert_eq!(engine.advance_by(Duration::from_millis(1000)), TickOutcome::Settled);
    assert_eq!(engine.moves(), 2);
    assert!(!engine.card(b1).unwrap().is_flipped);
    assert!(!engine.card(c1).unwrap().is_flipped);

    for symbol in ["B", "C", "D"] {
        let (first, second) = ids_of(&engine, symbol);
        engine.select_card(first);
        engine.select_card(second);
    }

    assert_eq!(engine.moves(), 5);
    assert!(!engine.is_won());
    assert_eq!(engine.advance_by(Duration::from_millis(500)), TickOutcome::Won);
    assert!(engine.is_won());
    assert!(engine.is_new_record());
    assert_eq!(engine.best_score(), Some(5));
}

#[test]
fn perfect_game_then_worse_game() {
    let mut engine = MatchEngine::new(abcd_config(), MemoryStore::new(), 3);

    for symbol in ["A", "B", "C", "D"] {
        let (first, second) = ids_of(&engine, symbol);
        engine.select_card(first);
        engine.select_card(second);
    }
    engine.advance_by(Duration::from_millis(500));
    assert!(engine.is_won());
    assert_eq!(engine.best_score(), Some(4));

    engine.reset();
    let (a1, _) = ids_of(&engine, "A");
    let (b1, _) = ids_of(&engine, "B");
    engine.select_card(a1);
    engine.select_card(b1);
    engine.advance_by(Duration::from_millis(1000));
    for symbol in ["A", "B", "C", "D"] {
        let (first, second) = ids_of(&engine, symbol);
        engine.select_card(first);
        engine.select_card(second);
    }
    engine.advance_by(Duration::from_millis(500));

    assert!(engine.is_won());
    assert_eq!(engine.moves(), 5);
    assert!(!engine.is_new_record());
    assert_eq!(engine.best_score(), Some(4));
    assert_eq!(
        engine.store().entry(EngineConfig::DEFAULT_STORAGE_KEY),
        Some("4")
    );
}

#[test]
fn regression_reset_right_after_mismatch() {
    let mut engine = MatchEngine::new(abcd_config(), MemoryStore::new(), 11);
    let (a1, _) = ids_of(&engine, "A");
    let (d1, _) = ids_of(&engine, "D");

    engine.select_card(a1);
    engine.select_card(d1);
    engine.reset();
    let fresh = engine.snapshot();

    engine.advance_by(Duration::from_millis(1500));
    assert_eq!(engine.snapshot(), fresh);
    assert_eq!(engine.moves(), 0);
    assert!(engine.cards().iter().all(Card::is_selectable));
}

#[derive(Clone, Debug)]
enum Action {
    Select(CardId),
    Wait(u64),
    Reset,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (0..10u16).prop_map(Action::Select),
        3 => (0..1200u64).prop_map(Action::Wait),
        1 => Just(Action::Reset),
    ]
}

fn check_invariants(engine: &MatchEngine, resolved: u32) -> std::result::Result<(), TestCaseError> {
    let selected = engine.selected_cards();
    prop_assert!(selected.len() <= 2);
    prop_assert_eq!(engine.is_checking(), selected.len() == 2);
    for id in &selected {
        let card = engine.card(*id).unwrap();
        prop_assert!(card.is_flipped);
        prop_assert!(!card.is_matched);
    }
    for card in engine.cards() {
        prop_assert!(!card.is_matched || card.is_face_up());
        let face_up_unmatched = card.is_flipped && !card.is_matched;
        prop_assert_eq!(face_up_unmatched, selected.contains(&card.id));
    }
    if engine.is_won() {
        prop_assert!(engine.cards().iter().all(|card| card.is_matched));
    }
    prop_assert_eq!(engine.moves(), resolved);
    Ok(())
}

proptest! {
    #[test]
    fn random_play_keeps_state_invariants(seed in any::<u64>(), actions in prop::collection::vec(action(), 1..120)) {
        let mut engine = MatchEngine::new(abcd_config(), MemoryStore::new(), seed);
        let mut resolved = 0;

        for action in actions {
            match action {
                Action::Select(id) => match engine.select_card(id) {
                    SelectOutcome::Matched | SelectOutcome::Completed => resolved += 1,
                    _ => {}
                },
                Action::Wait(millis) => {
                    if engine.advance_by(Duration::from_millis(millis)) == TickOutcome::Settled {
                        resolved += 1;
                    }
                }
                Action::Reset => {
                    engine.reset();
                    resolved = 0;
                }
            }
            check_invariants(&engine, resolved)?;
        }

        if let Some(best) = engine.best_score() {
            let best = best.to_string();
            prop_assert_eq!(
                engine.store().entry(EngineConfig::DEFAULT_STORAGE_KEY),
                Some(best.as_str())
            );
        }
    }
}
