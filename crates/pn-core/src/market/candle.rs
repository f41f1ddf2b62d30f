//! OHLC aggregation of the price history for charting.

use serde::{Deserialize, Serialize};

/// One open/high/low/close bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Index of the first history sample in this bar.
    pub tick: usize,
    /// Close of the previous bar, or the opening price for the first bar.
    pub open: f64,
    /// Highest price in the bar, including the open.
    pub high: f64,
    /// Lowest price in the bar, including the open.
    pub low: f64,
    /// Last sample in the bar.
    pub close: f64,
}

impl Candle {
    /// Whether the bar closed at or above its open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Group `history` into bars of `ticks_per_candle` samples (0 is treated as 1).
///
/// The final bar may hold fewer samples.
pub fn candles(opening: f64, history: &[f64], ticks_per_candle: usize) -> Vec<Candle> {
    let width = ticks_per_candle.max(1);
    let mut open = opening;
    history
        .chunks(width)
        .enumerate()
        .map(|(i, chunk)| {
            let (high, low) = chunk
                .iter()
                .fold((open, open), |(hi, lo), &p| (hi.max(p), lo.min(p)));
            let close = chunk[chunk.len() - 1];
            let candle = Candle {
                tick: i * width,
                open,
                high,
                low,
                close,
            };
            open = close;
            candle
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_no_candles() {
        assert!(candles(100.0, &[], 5).is_empty());
    }

    #[test]
    fn bars_chain_open_to_previous_close() {
        let bars = candles(100.0, &[101.0, 99.0, 103.0, 102.0, 98.0], 2);
        assert_eq!(bars.len(), 3);

        assert_eq!(
            bars[0],
            Candle {
                tick: 0,
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 99.0
            }
        );
        assert_eq!(
            bars[1],
            Candle {
                tick: 2,
                open: 99.0,
                high: 103.0,
                low: 99.0,
                close: 102.0
            }
        );
        assert_eq!(
            bars[2],
            Candle {
                tick: 4,
                open: 102.0,
                high: 102.0,
                low: 98.0,
                close: 98.0
            }
        );
        assert!(!bars[0].is_up());
        assert!(bars[1].is_up());
    }

    #[test]
    fn zero_width_means_one_sample_per_bar() {
        let bars = candles(10.0, &[11.0, 12.0], 0);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].open, 11.0);
    }
}
