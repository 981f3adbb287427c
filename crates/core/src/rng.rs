//! RNG module - injectable random sources for tile generation
//!
//! The resolver draws every fresh tile kind and every deadlock shuffle from a
//! [`RandomSource`]. Two implementations are provided:
//!
//! - [`SimpleRng`]: an LCG, deterministic for a given seed (used in play)
//! - [`CycleRng`]: replays a fixed list of values (used for scripted tests
//!   and replays)

/// Uniform integer source
pub trait RandomSource {
    /// Generate a value in range `[0, max)`. `max` is never 0.
    fn next_range(&mut self, max: u32) -> u32;

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
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

    /// Current state, enough to resume the same sequence
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits have short periods; take the high half.
        (self.next_u32() >> 16) % max.max(1)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a fixed sequence of values, wrapping around at the end
///
/// Each value is reduced modulo the requested range. An empty sequence
/// always yields 0.
#[derive(Debug, Clone, Default)]
pub struct CycleRng {
    values: Vec<u32>,
    cursor: usize,
}

impl CycleRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of values drawn so far
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for CycleRng {
    fn next_range(&mut self, max: u32) -> u32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v % max.max(1)
    }
}
