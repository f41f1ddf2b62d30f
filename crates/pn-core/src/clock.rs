//! Game duration and status.
//!
//! The clock takes `now` as an argument instead of reading the system time,
//! so it is deterministic under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Durations offered on the start screen, in seconds.
pub const GAME_DURATIONS: [u64; 4] = [30, 60, 90, 120];

/// Where the game is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Not started yet.
    Idle,
    /// Press conference in progress.
    Playing,
    /// Time ran out or the game was stopped.
    Finished,
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Countdown for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    duration_secs: u64,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameClock {
    /// A stopped clock for a game of `duration_secs` seconds.
    pub fn new(duration_secs: u64) -> CoreResult<Self> {
        if duration_secs == 0 {
            return Err(CoreError::InvalidDuration);
        }
        Ok(Self {
            duration_secs,
            started_at: None,
            ended_at: None,
        })
    }

    /// Start (or restart) the countdown.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.ended_at = None;
    }

    /// Stop the countdown. Has no effect on a clock that never started.
    pub fn finish(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_some() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Current lifecycle status.
    pub fn status(&self) -> GameStatus {
        match (self.started_at, self.ended_at) {
            (None, _) => GameStatus::Idle,
            (Some(_), None) => GameStatus::Playing,
            (Some(_), Some(_)) => GameStatus::Finished,
        }
    }

    /// Configured game length in seconds.
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Whole seconds left at `now`.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        let Some(start) = self.started_at else {
            return self.duration_secs;
        };
        let until = self.ended_at.unwrap_or(now);
        let elapsed = (until - start).num_seconds().max(0) as u64;
        self.duration_secs.saturating_sub(elapsed)
    }

    /// Whether a running game has used up its time.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status() == GameStatus::Playing && self.remaining_secs(now) == 0
    }
}

/// Render seconds as `MM:SS`.
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
