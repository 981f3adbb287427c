//! Scoring module - combo multiplier bookkeeping
//!
//! Scoring rules:
//! - A removal step awards `removed * base * multiplier`.
//! - `base` is [`MATCH_POINTS`](crate::types::MATCH_POINTS) for matches and
//!   [`SPECIAL_POINTS`](crate::types::SPECIAL_POINTS) for special activations.
//! - The multiplier is 1 for the first step of a player action and grows by
//!   one after every step, so it is a pure function of the step index.

/// Multiplier for the zero-based removal step within one action
pub fn multiplier_for_step(step: u32) -> u32 {
    step.saturating_add(1)
}

/// Points for one removal step
pub fn step_points(removed: usize, base: u32, multiplier: u32) -> u32 {
    let removed = u32::try_from(removed).unwrap_or(u32::MAX);
    removed.saturating_mul(base).saturating_mul(multiplier)
}

/// Running score plus the combo multiplier of the action in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreAccumulator {
    multiplier: u32,
    total: u32,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self {
            multiplier: multiplier_for_step(0),
            total: 0,
        }
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Score a removal step at the current multiplier and return its points
    pub fn award(&mut self, removed: usize, base: u32) -> u32 {
        let points = step_points(removed, base, self.multiplier);
        self.total = self.total.saturating_add(points);
        points
    }

    /// Move to the next step and return the new multiplier
    pub fn advance(&mut self) -> u32 {
        self.multiplier = self.multiplier.saturating_add(1);
        self.multiplier
    }

    /// Back to the first-step multiplier; the total is kept
    pub fn reset(&mut self) {
        self.multiplier = multiplier_for_step(0);
    }
}

impl Default for ScoreAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
