//! RNG module - 7-bag random piece generation
//!
//! A bag holds one of each of the seven piece kinds in shuffled order.
//! Pieces are popped from the bag until it is empty, then a fresh bag is
//! filled and shuffled. Any 7 draws aligned to a bag boundary therefore
//! contain every kind exactly once. Windows that straddle a boundary carry
//! no such guarantee.
//!
//! The shuffle is driven by a small seeded LCG so a seed reproduces a game.

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
        // A zero state would only ever produce the increment sequence
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate a value in `[0, max)` using the high bits, which are far
    /// better distributed than the low bits of a power-of-two LCG.
    pub fn next_below(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Uniform Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_below((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state, usable as a seed to continue the stream.
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct PieceBag {
    /// Remaining pieces of the current bag, drawn from the end
    bag: ArrayVec<PieceKind, 7>,
    rng: SimpleRng,
    /// Total pieces drawn since construction
    drawn: u64,
}

impl PieceBag {
    /// Create an empty bag; the first draw fills it.
    pub fn new(seed: u32) -> Self {
        Self {
            bag: ArrayVec::new(),
            rng: SimpleRng::new(seed),
            drawn: 0,
        }
    }

    /// A fresh, empty bag continuing this bag's random stream.
    pub fn reseeded(&self) -> Self {
        Self::new(self.rng.state())
    }

    fn refill(&mut self) {
        self.bag.clear();
        self.bag.extend(PieceKind::ALL);
        self.rng.shuffle(&mut self.bag);
    }

    /// Draw the next piece kind.
    pub fn next_piece(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.refill();
        }
        self.drawn += 1;
        // Refill guarantees the bag is non-empty here.
        self.bag.pop().unwrap_or(PieceKind::I)
    }

    /// Pieces left in the current bag.
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Number of draws so far. `drawn() % 7 == 0` marks a bag boundary.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Seed that reproduces the rest of this stream
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}
