//! Core game model for PR Nightmare.
//!
//! A CEO fields questions from reporter personas while the company's stock
//! price follows a random walk. This crate holds the pure parts of that game:
//! the price simulator with its decaying sentiment trend, the crowd roster and
//! turn scheduler, the persona roster, and the game clock. Nothing here does
//! I/O; the session controller in `pn-game` drives it.

/// Game duration and status tracking.
pub mod clock;
/// Configuration for the market and the crowd.
pub mod config;
/// Crowd members, raised hands, and turn rotation.
pub mod crowd;
/// Error types used throughout the crate.
pub mod error;
/// Price simulation, trend injection, and candle aggregation.
pub mod market;
/// Reporter personas.
pub mod persona;

/// Re-export clock types.
pub use clock::{GAME_DURATIONS, GameClock, GameStatus, format_remaining};
/// Re-export configuration types.
pub use config::{CrowdConfig, MAX_CROWD_SIZE, MarketConfig};
/// Re-export crowd types.
pub use crowd::{Crowd, CrowdMember, MemberId, TalkedAgents, raise_hands};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export market types.
pub use market::{Candle, PriceSnapshot, PriceState, Trend};
/// Re-export persona types.
pub use persona::{Persona, Voice, default_roster, persona_at};
