#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-evaluation data handed to every node on the way down the tree.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickContext {
    /// Number of root evaluations performed by the owning tree before this one.
    pub tick: u64,
    /// Seconds elapsed since the previous root evaluation.
    pub dt_seconds: f32,
}

impl TickContext {
    pub fn new(tick: u64, dt_seconds: f32) -> Self {
        Self { tick, dt_seconds }
    }

    /// Context for the evaluation that follows this one.
    pub fn next(self, dt_seconds: f32) -> Self {
        Self {
            tick: self.tick.wrapping_add(1),
            dt_seconds,
        }
    }
}
