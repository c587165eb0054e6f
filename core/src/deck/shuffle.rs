use super::*;

/// Generation strategy that lays out the paired deck and then applies a seeded Fisher-Yates shuffle.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledDeckGenerator {
    seed: u64,
}

impl ShuffledDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for ShuffledDeckGenerator {
    fn generate(self, palette: &Palette) -> Deck {
        use rand::prelude::*;

        let mut deck = Deck::paired(palette);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        fisher_yates(deck.cards_mut(), &mut rng);

        log::trace!("dealt {} cards with seed {:#018x}", deck.len(), self.seed);
        deck
    }
}

/// Uniform in-place permutation: for `i` from the last index down to 1, swap `i` with a `j` drawn from `0..=i`.
pub fn fisher_yates<T>(items: &mut [T], rng: &mut rand::rngs::SmallRng) {
    use rand::prelude::*;

    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Stream of per-deal seeds derived from one base seed.
///
/// Each deal gets a distinct but reproducible seed, so a whole session can be replayed from the base seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSequence {
    base: u64,
    deals: u64,
}

impl SeedSequence {
    const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    pub const fn new(base: u64) -> Self {
        Self { base, deals: 0 }
    }

    pub const fn deals(&self) -> u64 {
        self.deals
    }

    pub fn next_seed(&mut self) -> u64 {
        self.deals = self.deals.wrapping_add(1);
        self.base
            .wrapping_add(self.deals.wrapping_mul(Self::GOLDEN_GAMMA))
    }
}
