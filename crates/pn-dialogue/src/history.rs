//! Append-only chat history.
//!
//! Messages serialize to the chat-completions wire shape
//! (`{"role": ..., "content": [...]}`) so the history can be sent as-is.
//! Turns are only ever appended; a failed exchange commits nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions to the model.
    System,
    /// The CEO.
    User,
    /// A reporter.
    Assistant,
}

/// Base64 audio attached to a user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAudio {
    /// Base64-encoded audio bytes.
    pub data: String,
    /// Container format, e.g. `wav`.
    pub format: String,
}

/// One part of a message body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
    /// Recorded speech.
    InputAudio {
        /// The audio payload.
        input_audio: InputAudio,
    },
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Body parts.
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    /// A system instruction.
    pub fn system(text: impl Into<String>) -> Self {
        Self::text(Role::System, text)
    }

    /// A reporter line.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(Role::Assistant, text)
    }

    /// A spoken answer from the CEO, as base64 WAV.
    pub fn user_audio(wav_base64: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::InputAudio {
                input_audio: InputAudio {
                    data: wav_base64.into(),
                    format: "wav".to_string(),
                },
            }],
        }
    }

    fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }

    /// Concatenated text parts; audio parts are skipped.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::InputAudio { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the message carries recorded audio.
    pub fn has_audio(&self) -> bool {
        self.content
            .iter()
            .any(|part| matches!(part, ContentPart::InputAudio { .. }))
    }
}

/// A message with bookkeeping for the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// The message as sent to the service.
    pub message: ChatMessage,
    /// Display name of the speaker (reporter name or "CEO").
    pub speaker: String,
    /// Evaluation score attached to a CEO answer.
    pub score: Option<f64>,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// A turn recorded now.
    pub fn new(message: ChatMessage, speaker: impl Into<String>) -> Self {
        Self {
            message,
            speaker: speaker.into(),
            score: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the evaluation score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Ordered record of the whole press conference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    /// An empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one turn.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Append a batch of turns that succeeded together.
    pub fn commit(&mut self, turns: impl IntoIterator<Item = ChatTurn>) {
        self.turns.extend(turns);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// The wire messages, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.turns.iter().map(|t| t.message.clone()).collect()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Export the transcript as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Press Conference Transcript\n\n");
        for turn in &self.turns {
            let time = turn.timestamp.format("%H:%M:%S");
            match turn.message.role {
                Role::User => {
                    let body = if turn.message.has_audio() {
                        "*(spoken answer)*".to_string()
                    } else {
                        turn.message.text_content()
                    };
                    out.push_str(&format!("**{}** [{time}]: {body}", turn.speaker));
                    if let Some(score) = turn.score {
                        out.push_str(&format!(" (score {score:+.2})"));
                    }
                    out.push_str("\n\n");
                }
                Role::Assistant => {
                    out.push_str(&format!(
                        "**{}** [{time}]: {}\n\n",
                        turn.speaker,
                        turn.message.text_content()
                    ));
                }
                Role::System => {
                    out.push_str(&format!("> {}\n\n", turn.message.text_content()));
                }
            }
        }
        out
    }
}
