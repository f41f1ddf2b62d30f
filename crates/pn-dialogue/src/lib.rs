//! Boundary to the external generative dialogue service.
//!
//! The game never judges answers itself. A language model plays each reporter,
//! asks the questions, and scores the CEO's spoken answers through a
//! structured tool call. This crate defines that contract
//! ([`DialogueService`]), an OpenAI-compatible HTTP implementation, an offline
//! scripted implementation, the append-only chat history, and the audio
//! transcoder that normalizes recordings to mono 16 kHz WAV.

/// Audio normalization to mono 16 kHz WAV.
pub mod audio;
/// Service credentials and model selection.
pub mod config;
/// Error types for the dialogue boundary.
pub mod error;
/// Append-only chat history.
pub mod history;
/// OpenAI-compatible chat completions client.
pub mod openai;
/// System prompts for the reporter personas.
pub mod prompt;
/// Offline service driven by a script of evaluations.
pub mod scripted;
/// The dialogue service trait and its result types.
pub mod service;
/// Structured tool-call schemas and argument parsing.
pub mod tools;

pub use audio::{FfmpegTranscoder, PassthroughTranscoder, Transcoder, WavAudio};
pub use config::DialogueConfig;
pub use error::{DialogueError, DialogueResult};
pub use history::{ChatHistory, ChatMessage, ChatTurn, ContentPart, Role};
pub use openai::OpenAiDialogue;
pub use scripted::ScriptedDialogue;
pub use service::{DialogueService, Reply};
pub use tools::{CompanyProfile, Evaluation};
