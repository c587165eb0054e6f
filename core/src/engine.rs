use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Ids of the face-up cards awaiting resolution, never more than two.
pub type Selection = SmallVec<[CardId; 2]>;

/// Where a deal is in its lifecycle. Every transition is driven by a selection or a timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first card of a pair.
    Idle,
    /// One card is face-up, waiting for its partner.
    OneSelected(CardId),
    /// Two mismatched cards are face-up until the settle timer fires.
    Resolving(CardId, CardId),
    /// Every pair is matched, the win is declared when the reveal timer fires.
    Revealing,
    Won,
}

impl GamePhase {
    pub const fn accepts_selection(self) -> bool {
        matches!(self, Self::Idle | Self::OneSelected(_))
    }

    pub const fn is_checking(self) -> bool {
        matches!(self, Self::Resolving(..))
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }

    pub fn selected_cards(self) -> Selection {
        match self {
            Self::OneSelected(first) => SmallVec::from_slice(&[first]),
            Self::Resolving(first, second) => SmallVec::from_buf([first, second]),
            Self::Idle | Self::Revealing | Self::Won => SmallVec::new(),
        }
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Authoritative state of a single deal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    cards: Vec<Card>,
    moves: MoveCount,
    phase: GamePhase,
}

impl GameState {
    pub fn new(deck: Deck) -> Self {
        Self {
            cards: deck.into_cards(),
            moves: 0,
            phase: GamePhase::Idle,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub const fn moves(&self) -> MoveCount {
        self.moves
    }

    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn selected_cards(&self) -> Selection {
        self.phase.selected_cards()
    }

    pub const fn is_checking(&self) -> bool {
        self.phase.is_checking()
    }

    pub const fn is_won(&self) -> bool {
        self.phase.is_won()
    }

    pub fn total_pairs(&self) -> usize {
        self.cards.len() / 2
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|card| card.is_matched).count() / 2
    }

    pub fn all_matched(&self) -> bool {
        self.cards.iter().all(|card| card.is_matched)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    fn count_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub cards: Vec<Card>,
    pub moves: MoveCount,
    pub selected_cards: Selection,
    pub is_won: bool,
    pub is_checking: bool,
    pub best_score: Option<MoveCount>,
    pub is_new_record: bool,
}

/// Memory-matching engine: owns the current deal, the best score and the two pending timers.
///
/// The engine has its own monotonic clock, expressed as time since construction. Hosts move it forward with
/// [`MatchEngine::advance_to`] or [`MatchEngine::advance_by`] before forwarding input, and use
/// [`MatchEngine::next_deadline`] to know when to wake it up again.
#[derive(Debug)]
pub struct MatchEngine<S = MemoryStore> {
    config: EngineConfig,
    state: GameState,
    best_score: BestScore,
    is_new_record: bool,
    settle_timer: TimerSlot,
    win_timer: TimerSlot,
    clock: Duration,
    seeds: SeedSequence,
    store: S,
}

impl<S: ScoreStore> MatchEngine<S> {
    /// Deals the first game and loads the stored best score.
    pub fn new(config: EngineConfig, store: S, seed: u64) -> Self {
        let mut seeds = SeedSequence::new(seed);
        let deck = ShuffledDeckGenerator::new(seeds.next_seed()).generate(&config.palette);
        let mut engine = Self {
            config,
            state: GameState::new(deck),
            best_score: BestScore::none(),
            is_new_record: false,
            settle_timer: TimerSlot::idle(),
            win_timer: TimerSlot::idle(),
            clock: Duration::ZERO,
            seeds,
            store,
        };
        engine.load_best_score();
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn cards(&self) -> &[Card] {
        self.state.cards()
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.state.card(id)
    }

    pub fn moves(&self) -> MoveCount {
        self.state.moves()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn selected_cards(&self) -> Selection {
        self.state.selected_cards()
    }

    pub fn is_checking(&self) -> bool {
        self.state.is_checking()
    }

    pub fn is_won(&self) -> bool {
        self.state.is_won()
    }

    pub fn matched_pairs(&self) -> usize {
        self.state.matched_pairs()
    }

    pub fn total_pairs(&self) -> usize {
        self.state.total_pairs()
    }

    pub fn best_score(&self) -> Option<MoveCount> {
        self.best_score.get()
    }

    pub fn is_new_record(&self) -> bool {
        self.is_new_record
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tears the engine down, dropping any pending timer, and hands back the store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn pending_timer(&self, role: TimerRole) -> Option<Duration> {
        self.slot(role).deadline()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.settle_timer.deadline(), self.win_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.clock))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cards: self.state.cards.clone(),
            moves: self.state.moves,
            selected_cards: self.state.selected_cards(),
            is_won: self.state.is_won(),
            is_checking: self.state.is_checking(),
            best_score: self.best_score.get(),
            is_new_record: self.is_new_record,
        }
    }

    /// Turns a card face-up. Selections that are not allowed right now are ignored.
    pub fn select_card(&mut self, id: CardId) -> SelectOutcome {
        let first = match self.state.phase {
            GamePhase::Idle => None,
            GamePhase::OneSelected(first) => Some(first),
            phase => {
                log::trace!("ignoring card {} while {:?}", id, phase);
                return SelectOutcome::NoChange;
            }
        };

        let Some(card) = self.state.card_mut(id) else {
            log::trace!("ignoring unknown card {}", id);
            return SelectOutcome::NoChange;
        };
        if !card.is_selectable() {
            log::trace!("ignoring card {} that is already face-up", id);
            return SelectOutcome::NoChange;
        }
        card.is_flipped = true;

        match first {
            None => {
                self.state.phase = GamePhase::OneSelected(id);
                SelectOutcome::Flipped
            }
            Some(first) => self.resolve_pair(first, id),
        }
    }

    /// Starts a new deal. The best score survives, everything else is discarded.
    pub fn reset(&mut self) {
        let cancelled_settle = self.settle_timer.cancel();
        let cancelled_win = self.win_timer.cancel();
        if cancelled_settle || cancelled_win {
            log::debug!(
                "reset cancelled pending timers (settle: {}, win-reveal: {})",
                cancelled_settle,
                cancelled_win
            );
        }

        let deck = ShuffledDeckGenerator::new(self.seeds.next_seed()).generate(&self.config.palette);
        self.state = GameState::new(deck);
        self.is_new_record = false;
        log::debug!("new game #{}", self.seeds.deals());
    }

    /// Moves the clock forward and fires every timer that became due, earliest first. The clock never goes back.
    pub fn advance_to(&mut self, now: Duration) -> TickOutcome {
        if now > self.clock {
            self.clock = now;
        }

        let mut outcome = TickOutcome::NoChange;
        while let Some(role) = self.next_due_timer() {
            let now = self.clock;
            if !self.slot_mut(role).fire_if_due(now) {
                break;
            }
            outcome = outcome
                | match role {
                    TimerRole::Settle => self.settle(),
                    TimerRole::WinReveal => self.reveal_win(),
                };
        }
        outcome
    }

    pub fn advance_by(&mut self, elapsed: Duration) -> TickOutcome {
        self.advance_to(self.clock.saturating_add(elapsed))
    }

    /// Reads the record from the store. Missing, unreadable or corrupt records leave no best score.
    pub fn load_best_score(&mut self) -> Option<MoveCount> {
        self.best_score = match BestScore::load(&self.store, &self.config.storage_key) {
            Ok(best) => {
                log::debug!("best score: {:?}", best.get());
                best
            }
            Err(err @ BestScoreError::Parse(_)) => {
                log::warn!("Ignoring stored best score: {:?}", err);
                BestScore::none()
            }
            Err(err) => {
                log::error!("Error loading best score: {:?}", err);
                BestScore::none()
            }
        };
        self.best_score.get()
    }

    /// Records `moves` as the best score and persists it. The in-memory record is kept even if the write fails.
    pub fn save_best_score(&mut self, moves: MoveCount) -> bool {
        self.best_score = BestScore::of(moves);
        match BestScore::save(&mut self.store, &self.config.storage_key, moves) {
            Ok(()) => true,
            Err(err) => {
                log::error!("Error saving best score: {:?}", err);
                false
            }
        }
    }

    fn resolve_pair(&mut self, first: CardId, second: CardId) -> SelectOutcome {
        for role in [TimerRole::Settle, TimerRole::WinReveal] {
            if self.slot_mut(role).cancel() {
                log::debug!("dropped stale {} timer", role);
            }
        }
        self.state.phase = GamePhase::Resolving(first, second);

        let is_match = match (self.state.card(first), self.state.card(second)) {
            (Some(a), Some(b)) => a.pairs_with(b),
            _ => false,
        };

        if !is_match {
            let at = self.clock.saturating_add(self.config.settle_delay);
            self.settle_timer.schedule(at);
            log::debug!("mismatch {} / {}, settling at {:?}", first, second, at);
            return SelectOutcome::Mismatched;
        }

        for id in [first, second] {
            if let Some(card) = self.state.card_mut(id) {
                card.is_matched = true;
            }
        }
        self.state.count_move();

        if !self.state.all_matched() {
            self.state.phase = GamePhase::Idle;
            log::debug!("match {} / {}, moves: {}", first, second, self.state.moves);
            return SelectOutcome::Matched;
        }

        self.state.phase = GamePhase::Revealing;
        let at = self.clock.saturating_add(self.config.win_reveal_delay);
        self.win_timer.schedule(at);
        let final_moves = self.state.moves;
        log::debug!("all pairs matched in {} moves, revealing at {:?}", final_moves, at);

        self.record_completion(final_moves);
        SelectOutcome::Completed
    }

    fn record_completion(&mut self, final_moves: MoveCount) {
        if self.best_score.is_beaten_by(final_moves) {
            log::info!(
                "new best score {} (previous {:?})",
                final_moves,
                self.best_score.get()
            );
            self.is_new_record = true;
            self.save_best_score(final_moves);
        } else {
            self.is_new_record = false;
        }
    }

    fn settle(&mut self) -> TickOutcome {
        let GamePhase::Resolving(first, second) = self.state.phase else {
            log::warn!("settle timer fired while {:?}", self.state.phase);
            return TickOutcome::NoChange;
        };

        for id in [first, second] {
            if let Some(card) = self.state.card_mut(id) {
                card.is_flipped = false;
            }
        }
        self.state.count_move();
        self.state.phase = GamePhase::Idle;
        log::debug!("settled {} / {}, moves: {}", first, second, self.state.moves);
        TickOutcome::Settled
    }

    fn reveal_win(&mut self) -> TickOutcome {
        if !matches!(self.state.phase, GamePhase::Revealing) {
            log::warn!("win-reveal timer fired while {:?}", self.state.phase);
            return TickOutcome::NoChange;
        }

        self.state.phase = GamePhase::Won;
        log::debug!("game won in {} moves", self.state.moves);
        TickOutcome::Won
    }

    fn next_due_timer(&self) -> Option<TimerRole> {
        [TimerRole::Settle, TimerRole::WinReveal]
            .into_iter()
            .filter(|&role| self.slot(role).is_due(self.clock))
            .min_by_key(|&role| self.slot(role).deadline())
    }

    fn slot(&self, role: TimerRole) -> &TimerSlot {
        match role {
            TimerRole::Settle => &self.settle_timer,
            TimerRole::WinReveal => &self.win_timer,
        }
    }

    fn slot_mut(&mut self, role: TimerRole) -> &mut TimerSlot {
        match role {
            TimerRole::Settle => &mut self.settle_timer,
            TimerRole::WinReveal => &mut self.win_timer,
        }
    }
}
