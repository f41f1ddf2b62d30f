//! The contract between the game and the generative dialogue service.

use std::future::Future;

use pn_core::Persona;
use serde::{Deserialize, Serialize};

use crate::error::DialogueResult;
use crate::history::ChatMessage;
use crate::tools::{CompanyProfile, Evaluation};

/// A reporter's line, as text and optionally as spoken audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// What the reporter said.
    pub transcript: String,
    /// Spoken version as base64 WAV, when the service produced audio.
    pub audio_base64: Option<String>,
}

impl Reply {
    /// A text-only reply.
    pub fn text(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            audio_base64: None,
        }
    }
}

/// A generative service that plays the reporters and judges the CEO.
///
/// `conversation` is the exchange so far with the current reporter, ending
/// with the CEO's latest answer when there is one. Implementations must not
/// keep state between calls that the caller cannot see; the caller owns the
/// history and decides what gets committed.
pub trait DialogueService: Send + Sync {
    /// Invent the company the CEO is defending.
    fn company_profile(&self) -> impl Future<Output = DialogueResult<CompanyProfile>> + Send;

    /// Have `persona` introduce themself and ask the first question.
    fn opening_question(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
    ) -> impl Future<Output = DialogueResult<Reply>> + Send;

    /// Score the CEO's latest answer.
    fn evaluate(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
        conversation: &[ChatMessage],
    ) -> impl Future<Output = DialogueResult<Evaluation>> + Send;

    /// Have `persona` respond to the latest answer, closing the exchange if asked.
    fn reply(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
        conversation: &[ChatMessage],
        end_of_conversation: bool,
    ) -> impl Future<Output = DialogueResult<Reply>> + Send;
}
