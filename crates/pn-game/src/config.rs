//! Configuration for a press conference game.

use std::time::Duration;

use pn_core::{CrowdConfig, MarketConfig};

/// Fastest allowed market tick.
pub const MIN_TICK_MS: u64 = 500;
/// Slowest allowed market tick.
pub const MAX_TICK_MS: u64 = 1000;

/// Configuration for one game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Price simulation parameters.
    pub market: MarketConfig,
    /// Crowd size and hands per round.
    pub crowd: CrowdConfig,
    /// RNG seed for the crowd and the market.
    pub seed: u64,
    /// Interval between market ticks.
    pub tick_interval: Duration,
    /// Whether the market ticks on its own timer. When off, call `Game::tick`.
    pub auto_tick: bool,
    /// Length of the game in seconds.
    pub duration_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            market: MarketConfig::default(),
            crowd: CrowdConfig::default(),
            seed: 42,
            tick_interval: Duration::from_millis(MAX_TICK_MS),
            auto_tick: true,
            duration_secs: 60,
        }
    }
}

impl GameConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the market parameters.
    pub fn with_market(mut self, market: MarketConfig) -> Self {
        self.market = market;
        self
    }

    /// Set the crowd parameters.
    pub fn with_crowd(mut self, crowd: CrowdConfig) -> Self {
        self.crowd = crowd;
        self
    }

    /// Set the tick interval in milliseconds (clamped to 500-1000).
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval = Duration::from_millis(ms.clamp(MIN_TICK_MS, MAX_TICK_MS));
        self
    }

    /// Drive the market by hand instead of by timer.
    pub fn with_manual_ticks(mut self) -> Self {
        self.auto_tick = false;
        self
    }

    /// Set the game length in seconds.
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = secs;
        self
    }
}
