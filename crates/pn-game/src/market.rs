//! The market actor.
//!
//! One task owns the [`PriceState`] and its RNG. The tick timer and trend
//! commands from the session both go through the same `select!` loop, so price
//! updates are applied one at a time in arrival order.

use std::time::Duration;

use pn_core::{PriceSnapshot, PriceState};
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::error::{GameError, GameResult};

const COMMAND_BUFFER: usize = 32;

/// Commands accepted by the market actor.
#[derive(Debug)]
enum MarketCommand {
    Tick,
    ApplyTrend(f64),
    Snapshot(oneshot::Sender<PriceSnapshot>),
    History(oneshot::Sender<Vec<f64>>),
    Shutdown(oneshot::Sender<PriceState>),
}

/// Handle to a running market actor.
#[derive(Debug)]
pub struct MarketHandle {
    tx: mpsc::Sender<MarketCommand>,
    task: JoinHandle<()>,
}

impl MarketHandle {
    /// Spawn the actor. With `tick_every`, it advances the price on that
    /// interval; without, only on [`MarketHandle::tick`].
    pub fn spawn(state: PriceState, rng: StdRng, tick_every: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let interval = tick_every.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let task = tokio::spawn(run(state, rng, rx, interval));
        Self { tx, task }
    }

    /// Advance the price by one sample.
    pub async fn tick(&self) -> GameResult<()> {
        self.send(MarketCommand::Tick).await
    }

    /// Inject a trend from an evaluation score.
    pub async fn apply_trend(&self, score: f64) -> GameResult<()> {
        self.send(MarketCommand::ApplyTrend(score)).await
    }

    /// Current observable state.
    pub async fn snapshot(&self) -> GameResult<PriceSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(MarketCommand::Snapshot(reply)).await?;
        rx.await.map_err(|_| GameError::MarketClosed)
    }

    /// Every price sample so far.
    pub async fn history(&self) -> GameResult<Vec<f64>> {
        let (reply, rx) = oneshot::channel();
        self.send(MarketCommand::History(reply)).await?;
        rx.await.map_err(|_| GameError::MarketClosed)
    }

    /// Stop the actor and take back the final state. Commands queued before
    /// the shutdown are applied first; pending timer ticks are dropped.
    pub async fn shutdown(self) -> GameResult<PriceState> {
        let (reply, rx) = oneshot::channel();
        self.send(MarketCommand::Shutdown(reply)).await?;
        let state = rx.await.map_err(|_| GameError::MarketClosed)?;
        // the actor returns right after replying
        if let Err(error) = self.task.await {
            warn!(%error, "market actor did not stop cleanly");
        }
        Ok(state)
    }

    async fn send(&self, command: MarketCommand) -> GameResult<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| GameError::MarketClosed)
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn run(
    mut state: PriceState,
    mut rng: StdRng,
    mut rx: mpsc::Receiver<MarketCommand>,
    mut interval: Option<Interval>,
) {
    let shutdown = loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(MarketCommand::Tick) => {
                    state.advance(&mut rng);
                }
                Some(MarketCommand::ApplyTrend(score)) => {
                    state.apply_trend(score, &mut rng);
                    debug!(
                        score,
                        steps = state.trend().remaining_steps(),
                        "trend applied"
                    );
                }
                Some(MarketCommand::Snapshot(reply)) => {
                    let _ = reply.send(state.snapshot());
                }
                Some(MarketCommand::History(reply)) => {
                    let _ = reply.send(state.history().to_vec());
                }
                Some(MarketCommand::Shutdown(reply)) => break Some(reply),
                None => break None,
            },
            _ = next_tick(&mut interval) => {
                let price = state.advance(&mut rng);
                trace!(tick = state.ticks(), price, "market tick");
            }
        }
    };

    debug!(ticks = state.ticks(), price = state.current_price(), "market closed");
    if let Some(reply) = shutdown {
        let _ = reply.send(state);
    }
}
