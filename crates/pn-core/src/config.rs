//! Configuration for the market and the crowd.

use serde::{Deserialize, Serialize};

/// Parameters of the stock price random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Price at the start of the game.
    pub initial_price: f64,
    /// Scale of both the per-tick noise and the trend pull.
    pub volatility: f64,
    /// Shortest trend horizon in ticks.
    pub min_trend_steps: u32,
    /// Longest trend horizon in ticks (inclusive).
    pub max_trend_steps: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            volatility: 10.0,
            min_trend_steps: 10,
            max_trend_steps: 100,
        }
    }
}

impl MarketConfig {
    /// Set the opening price (negative values become 0).
    pub fn with_initial_price(mut self, price: f64) -> Self {
        self.initial_price = price.max(0.0);
        self
    }

    /// Set the volatility (negative values become 0).
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.max(0.0);
        self
    }

    /// Set the trend horizon range. Bounds are swapped if given in reverse.
    pub fn with_trend_steps(mut self, min: u32, max: u32) -> Self {
        self.min_trend_steps = min.min(max);
        self.max_trend_steps = min.max(max);
        self
    }
}

/// Largest crowd the press room seats.
pub const MAX_CROWD_SIZE: usize = 1_000;

/// Parameters of the press-room crowd.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdConfig {
    /// Number of crowd members (one avatar seed each).
    pub size: usize,
    /// How many hands go up after each resolved turn.
    pub hands: usize,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self { size: 30, hands: 5 }
    }
}

impl CrowdConfig {
    /// Set the crowd size, capped at [`MAX_CROWD_SIZE`].
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size.min(MAX_CROWD_SIZE);
        self
    }

    /// Set how many hands are raised per pass.
    pub fn with_hands(mut self, hands: usize) -> Self {
        self.hands = hands;
        self
    }
}
