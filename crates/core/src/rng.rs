//! RNG module - seeded piece generation
//!
//! Two randomizers are available:
//!
//! - [`Randomizer::Uniform`]: every draw picks one of the seven kinds with equal
//!   probability. No fairness guarantee; long droughts are possible.
//! - [`Randomizer::Bag`]: the "7-bag" scheme. Each shuffled bag contains every
//!   kind exactly once and is drawn empty before a new bag is shuffled.
//!
//! Both are driven by a small LCG so a given seed always yields the same sequence.
//! A generator can also replay a fixed list of kinds ([`PieceGenerator::sequence`]),
//! which is how tests and benches set up known positions.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would be a fixed point of the multiply step.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits, which are far better distributed than the low bits
    /// of a power-of-two LCG.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// How new piece kinds are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Randomizer {
    #[default]
    Uniform,
    Bag,
}

/// Seeded source of piece kinds.
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    randomizer: Randomizer,
    rng: SimpleRng,
    /// Remaining kinds of the current bag, drawn from the back.
    bag: ArrayVec<PieceKind, 7>,
    /// Fixed cycle of kinds; overrides the randomizer when non-empty.
    script: Vec<PieceKind>,
    script_pos: usize,
}

impl PieceGenerator {
    pub fn new(seed: u32, randomizer: Randomizer) -> Self {
        Self {
            randomizer,
            rng: SimpleRng::new(seed),
            bag: ArrayVec::new(),
            script: Vec::new(),
            script_pos: 0,
        }
    }

    /// Generator that cycles through `kinds` forever.
    ///
    /// An empty list falls back to the uniform randomizer.
    pub fn sequence(kinds: &[PieceKind]) -> Self {
        Self {
            script: kinds.to_vec(),
            ..Self::new(1, Randomizer::Uniform)
        }
    }

    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    fn refill_bag(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.rng.shuffle(&mut self.bag);
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        if !self.script.is_empty() {
            let kind = self.script[self.script_pos % self.script.len()];
            self.script_pos = self.script_pos.wrapping_add(1);
            return kind;
        }
        match self.randomizer {
            Randomizer::Uniform => PieceKind::ALL[self.rng.next_range(7) as usize],
            Randomizer::Bag => {
                if self.bag.is_empty() {
                    self.refill_bag();
                }
                // The bag was just refilled if it was empty.
                self.bag.pop().unwrap_or(PieceKind::I)
            }
        }
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1, Randomizer::default())
    }
}
