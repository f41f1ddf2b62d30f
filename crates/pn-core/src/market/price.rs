//! The price random walk.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::candle::{Candle, candles};
use super::trend::Trend;
use crate::config::MarketConfig;

/// The stock price and everything that moves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceState {
    initial_price: f64,
    current_price: f64,
    volatility: f64,
    trend: Trend,
    min_trend_steps: u32,
    max_trend_steps: u32,
    history: Vec<f64>,
}

impl PriceState {
    /// Open the market at the configured price and volatility.
    pub fn new(config: &MarketConfig) -> Self {
        let initial_price = config.initial_price.max(0.0);
        Self {
            initial_price,
            current_price: initial_price,
            volatility: config.volatility.max(0.0),
            trend: Trend::default(),
            min_trend_steps: config.min_trend_steps,
            max_trend_steps: config.max_trend_steps,
            history: Vec::new(),
        }
    }

    /// Produce the next price sample and append it to the history.
    ///
    /// Noise is uniform in `[-volatility/2, volatility/2)`; an active trend
    /// adds `volatility * 0.5 * trend`. The price never drops below zero.
    pub fn advance(&mut self, rng: &mut StdRng) -> f64 {
        let random_change = self.volatility * (rng.random::<f64>() - 0.5);

        self.trend.expire_if_spent();
        let trend_influence = self.volatility * 0.5 * self.trend.value();

        self.current_price = (self.current_price + random_change + trend_influence).max(0.0);
        self.trend.step();

        self.history.push(self.current_price);
        self.current_price
    }

    /// Replace the trend with `score`, lasting a randomly drawn number of ticks.
    pub fn apply_trend(&mut self, score: f64, rng: &mut StdRng) {
        self.trend = Trend::draw(score, self.min_trend_steps, self.max_trend_steps, rng);
    }

    /// The latest price.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// The opening price.
    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    /// The configured volatility.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// The trend currently biasing the walk.
    pub fn trend(&self) -> &Trend {
        &self.trend
    }

    /// All samples produced so far, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Number of ticks taken.
    pub fn ticks(&self) -> usize {
        self.history.len()
    }

    /// Change since the open, in percent.
    pub fn change_percent(&self) -> f64 {
        if self.initial_price == 0.0 {
            return 0.0;
        }
        (self.current_price - self.initial_price) / self.initial_price * 100.0
    }

    /// Fold the history into OHLC candles of `ticks_per_candle` samples.
    pub fn candles(&self, ticks_per_candle: usize) -> Vec<Candle> {
        candles(self.initial_price, &self.history, ticks_per_candle)
    }

    /// A copy of the observable state.
    pub fn snapshot(&self) -> PriceSnapshot {
        PriceSnapshot {
            tick: self.ticks(),
            price: self.current_price,
            initial_price: self.initial_price,
            change_percent: self.change_percent(),
            trend: self.trend.value(),
            trend_remaining_steps: self.trend.remaining_steps(),
        }
    }
}

/// A point-in-time view of the market, cheap to clone and send.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    /// Ticks taken so far.
    pub tick: usize,
    /// Latest price.
    pub price: f64,
    /// Opening price.
    pub initial_price: f64,
    /// Change since the open, in percent.
    pub change_percent: f64,
    /// Current trend bias.
    pub trend: f64,
    /// Ticks left on the trend.
    pub trend_remaining_steps: u32,
}
