use crate::crowd::MemberId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the crowd and clock. The price simulator never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// No crowd member with this ID exists.
    #[error("crowd member not found: {0}")]
    UnknownMember(MemberId),

    /// The member was picked without a raised hand.
    #[error("crowd member {0} has no question")]
    NoQuestion(MemberId),

    /// The member is already at the microphone.
    #[error("crowd member {0} is already talking")]
    AlreadyTalking(MemberId),

    /// A persona index outside the roster.
    #[error("persona index {index} out of range (roster has {len})")]
    UnknownPersona {
        /// The requested index.
        index: usize,
        /// Number of personas in the roster.
        len: usize,
    },

    /// A game duration of zero seconds.
    #[error("game duration must be at least one second")]
    InvalidDuration,
}
