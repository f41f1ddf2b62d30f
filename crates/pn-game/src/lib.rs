//! Press conference runner for PR Nightmare.
//!
//! Ties the game model to the dialogue service: [`Game`] calls on reporters,
//! sends recorded answers out for judgment, and feeds each score into the
//! market actor as a decaying trend.

pub mod config;
pub mod error;
pub mod market;
pub mod recording;
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use market::MarketHandle;
pub use recording::load_recording;
pub use session::{Game, GameSummary, TurnOutcome};
