//! Sentiment trend with a finite horizon.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A signed bias in [-1, 1] applied to the price walk for a limited number of ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    value: f64,
    remaining_steps: u32,
}

impl Trend {
    /// Create a trend from a score (clamped to [-1, 1]) lasting `steps` ticks.
    ///
    /// Non-finite scores become a neutral trend.
    pub fn new(score: f64, steps: u32) -> Self {
        let value = if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            value,
            remaining_steps: steps,
        }
    }

    /// Create a trend whose horizon is drawn uniformly from `min..=max` ticks.
    pub fn draw(score: f64, min: u32, max: u32, rng: &mut StdRng) -> Self {
        let steps = rng.random_range(min.min(max)..=max.max(min));
        Self::new(score, steps)
    }

    /// The current bias.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Ticks left before the trend expires.
    pub fn remaining_steps(&self) -> u32 {
        self.remaining_steps
    }

    /// Whether the trend still has ticks left.
    pub fn is_active(&self) -> bool {
        self.remaining_steps > 0
    }

    /// Reset the bias to neutral once the horizon is used up.
    pub(crate) fn expire_if_spent(&mut self) {
        if self.remaining_steps == 0 {
            self.value = 0.0;
        }
    }

    /// Consume one tick of the horizon.
    pub(crate) fn step(&mut self) {
        self.remaining_steps = self.remaining_steps.saturating_sub(1);
    }
}
