//! RNG module - local piece generation
//!
//! The session asks a [`PieceRandomizer`] for the next piece whenever the
//! external feed has nothing fresh. The default source is a uniform pick over
//! the seven variants driven by a small LCG, so a seed fully determines the
//! local piece sequence.

use crate::types::PieceKind;

/// Source of locally generated piece kinds
pub trait PieceRandomizer: Send {
    /// Pick the next piece kind
    fn next_kind(&mut self) -> PieceKind;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are the well-mixed ones.
        ((self.next_u32() >> 8) as u64 * max as u64 >> 24) as u32
    }

    /// Get the current RNG state (reseeding with it continues the sequence)
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl PieceRandomizer for SimpleRng {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_range(PieceKind::ALL.len() as u32) as usize]
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed piece sequence, cycling when exhausted
///
/// Used for replays and deterministic scenarios.
#[derive(Debug, Clone)]
pub struct ScriptedPieces {
    sequence: Vec<PieceKind>,
    cursor: usize,
}

impl ScriptedPieces {
    /// # Panics
    ///
    /// Panics if `sequence` is empty.
    pub fn new(sequence: Vec<PieceKind>) -> Self {
        assert!(!sequence.is_empty(), "scripted sequence must not be empty");
        Self {
            sequence,
            cursor: 0,
        }
    }

    /// Always yield the same kind
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceRandomizer for ScriptedPieces {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.sequence[self.cursor % self.sequence.len()];
        self.cursor = self.cursor.wrapping_add(1);
        kind
    }
}
