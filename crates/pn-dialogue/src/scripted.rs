//! Offline dialogue service.
//!
//! Plays back a queue of evaluations and builds reporter lines from the
//! persona, so the game can run without network access or credentials.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use pn_core::Persona;

use crate::error::{DialogueError, DialogueResult};
use crate::history::ChatMessage;
use crate::prompt::MAX_EXCHANGES;
use crate::service::{DialogueService, Reply};
use crate::tools::{CompanyProfile, Evaluation};

/// A [`DialogueService`] that replays scripted evaluations.
#[derive(Debug, Default)]
pub struct ScriptedDialogue {
    company: CompanyProfile,
    evaluations: Mutex<VecDeque<DialogueResult<Evaluation>>>,
    fallback: Option<Evaluation>,
    reply_failures: Mutex<VecDeque<DialogueError>>,
}

impl ScriptedDialogue {
    /// An empty script. Evaluations fail once the queue runs dry unless a
    /// fallback is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this company instead of the default one.
    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    /// Queue the next evaluation.
    pub fn with_evaluation(self, score: f64, end_of_conversation: bool) -> Self {
        self.push(Ok(Evaluation::new(score, end_of_conversation)));
        self
    }

    /// Queue a failing evaluation.
    pub fn with_failure(self, error: DialogueError) -> Self {
        self.push(Err(error));
        self
    }

    /// Fail the next reply with `error`. Later replies succeed again.
    pub fn with_reply_failure(self, error: DialogueError) -> Self {
        lock(&self.reply_failures).push_back(error);
        self
    }

    /// Evaluation returned once the queue is empty.
    pub fn with_fallback(mut self, score: f64, end_of_conversation: bool) -> Self {
        self.fallback = Some(Evaluation::new(score, end_of_conversation));
        self
    }

    /// Queue an evaluation on a shared script.
    pub fn push(&self, evaluation: DialogueResult<Evaluation>) {
        self.queue().push_back(evaluation);
    }

    /// Evaluations still queued.
    pub fn remaining(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<DialogueResult<Evaluation>>> {
        lock(&self.evaluations)
    }

    fn next_evaluation(&self, conversation: &[ChatMessage]) -> DialogueResult<Evaluation> {
        if let Some(next) = self.queue().pop_front() {
            return next;
        }
        if let Some(fallback) = self.fallback {
            // the reporter gives up after enough unanswered questions
            let answers = conversation.iter().filter(|m| m.has_audio()).count() as u32;
            let end = fallback.end_of_conversation || answers >= MAX_EXCHANGES;
            return Ok(Evaluation::new(fallback.score, end));
        }
        Err(DialogueError::ScriptExhausted("evaluations"))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DialogueService for ScriptedDialogue {
    async fn company_profile(&self) -> DialogueResult<CompanyProfile> {
        Ok(self.company.clone())
    }

    async fn opening_question(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
    ) -> DialogueResult<Reply> {
        Ok(Reply::text(format!(
            "{} from {}. {}, is it true {} is hiding something?",
            persona.name, persona.network, company.ceo_name, company.company_name
        )))
    }

    async fn evaluate(
        &self,
        _persona: &Persona,
        _company: &CompanyProfile,
        conversation: &[ChatMessage],
    ) -> DialogueResult<Evaluation> {
        self.next_evaluation(conversation)
    }

    async fn reply(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
        _conversation: &[ChatMessage],
        end_of_conversation: bool,
    ) -> DialogueResult<Reply> {
        if let Some(error) = lock(&self.reply_failures).pop_front() {
            return Err(error);
        }
        let line = if end_of_conversation {
            format!("Thank you, {}. {} signing off.", company.ceo_name, persona.name)
        } else {
            format!("That's not an answer, {}. Try again.", company.ceo_name)
        };
        Ok(Reply::text(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::default_roster;

    #[tokio::test]
    async fn replays_queue_in_order() {
        let script = ScriptedDialogue::new()
            .with_evaluation(0.5, false)
            .with_evaluation(-1.0, true);
        let persona = &default_roster()[0];
        let company = CompanyProfile::default();

        let first = script.evaluate(persona, &company, &[]).await.unwrap();
        assert_eq!(first, Evaluation::new(0.5, false));
        let second = script.evaluate(persona, &company, &[]).await.unwrap();
        assert!(second.end_of_conversation);
        assert_eq!(script.remaining(), 0);

        let err = script.evaluate(persona, &company, &[]).await.unwrap_err();
        assert!(matches!(err, DialogueError::ScriptExhausted(_)));
    }

    #[tokio::test]
    async fn fallback_ends_after_max_exchanges() {
        let script = ScriptedDialogue::new().with_fallback(0.2, false);
        let persona = &default_roster()[0];
        let company = CompanyProfile::default();

        let one = vec![ChatMessage::user_audio("a")];
        assert!(!script.evaluate(persona, &company, &one).await.unwrap().end_of_conversation);

        let three = vec![
            ChatMessage::user_audio("a"),
            ChatMessage::user_audio("b"),
            ChatMessage::user_audio("c"),
        ];
        assert!(script.evaluate(persona, &company, &three).await.unwrap().end_of_conversation);
    }

    #[tokio::test]
    async fn queued_failures_surface() {
        let script = ScriptedDialogue::new()
            .with_failure(DialogueError::MissingToolCall("generate_evaluation_score"));
        let persona = &default_roster()[0];
        let err = script
            .evaluate(persona, &CompanyProfile::default(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DialogueError::MissingToolCall(_)));
    }

    #[tokio::test]
    async fn queued_reply_failure_fails_once() {
        let script = ScriptedDialogue::new()
            .with_reply_failure(DialogueError::MalformedResponse("boom".into()));
        let persona = &default_roster()[0];
        let company = CompanyProfile::default();

        let err = script.reply(persona, &company, &[], false).await.unwrap_err();
        assert!(matches!(err, DialogueError::MalformedResponse(_)));
        let line = script.reply(persona, &company, &[], false).await.unwrap();
        assert!(line.transcript.contains("Try again"));
    }

    #[tokio::test]
    async fn opening_question_names_reporter() {
        let script = ScriptedDialogue::new();
        let persona = &default_roster()[6];
        let q = script
            .opening_question(persona, &CompanyProfile::default())
            .await
            .unwrap();
        assert!(q.transcript.starts_with("Sarah O'Connor from Pulse News Network."));
        assert!(q.audio_base64.is_none());
    }
}
