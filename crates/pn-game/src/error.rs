//! Error types for a press conference session.

use pn_core::CoreError;
use pn_dialogue::DialogueError;
use thiserror::Error;

/// Result type for session operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced to whoever drives the session.
#[derive(Debug, Error)]
pub enum GameError {
    /// Missing or invalid setup, e.g. no API key.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The dialogue service failed for this turn.
    #[error("dialogue service error: {0}")]
    Service(#[source] DialogueError),

    /// The recorded answer could not be read or converted.
    #[error("input error: {0}")]
    Input(String),

    /// No game is running.
    #[error("no game in progress")]
    NotPlaying,

    /// An answer arrived while no reporter was at the microphone.
    #[error("no reporter is at the microphone")]
    NoActiveConversation,

    /// Crowd or clock rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The market actor has shut down.
    #[error("market is closed")]
    MarketClosed,
}

impl From<DialogueError> for GameError {
    fn from(err: DialogueError) -> Self {
        match err {
            e if e.is_configuration() => Self::Configuration(e.to_string()),
            e @ (DialogueError::Transcode(_) | DialogueError::InvalidAudio(_)) => {
                Self::Input(e.to_string())
            }
            e => Self::Service(e),
        }
    }
}
