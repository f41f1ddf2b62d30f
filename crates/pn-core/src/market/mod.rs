//! Stock price simulation.
//!
//! The price is a random walk whose step size is set by a single volatility
//! parameter. After each judged answer a [`Trend`] biases the walk for a
//! randomly drawn number of ticks, then expires back to neutral.

pub mod candle;
pub mod price;
pub mod trend;

pub use candle::{Candle, candles};
pub use price::{PriceSnapshot, PriceState};
pub use trend::Trend;
