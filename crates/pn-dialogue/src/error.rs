/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors at the boundary to the generative service and the transcoder.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// A required credential or setting is missing.
    #[error("missing configuration: {0} is not set")]
    MissingCredential(&'static str),

    /// The HTTP request could not be sent or its body not read.
    #[error("request to dialogue service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("dialogue service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response did not have the expected shape.
    #[error("malformed response from dialogue service: {0}")]
    MalformedResponse(String),

    /// The response carried no call to the required tool.
    #[error("dialogue service did not call `{0}`")]
    MissingToolCall(&'static str),

    /// The transcoder process failed.
    #[error("audio transcoding failed: {0}")]
    Transcode(String),

    /// Audio bytes are not a usable WAV file.
    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    /// An offline script ran out of entries.
    #[error("scripted dialogue has no more {0}")]
    ScriptExhausted(&'static str),
}

impl DialogueError {
    /// Whether this is a startup configuration problem rather than a per-turn failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingCredential(_))
    }
}
