//! OpenAI-compatible chat completions client.
//!
//! Request building and response extraction are plain functions over the
//! wire types so they can be tested without a server. [`OpenAiDialogue`] only
//! adds the HTTP round trip.

use pn_core::Persona;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DialogueConfig;
use crate::error::{DialogueError, DialogueResult};
use crate::history::ChatMessage;
use crate::prompt::{closing_instruction, company_prompt, followup_prompt, opening_prompt};
use crate::service::{DialogueService, Reply};
use crate::tools::{
    COMPANY_TOOL, CompanyProfile, EVALUATION_TOOL, Evaluation, company_tool, evaluation_tool,
    parse_company, parse_evaluation,
};

/// Requested audio output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioOptions {
    /// Voice name.
    pub voice: String,
    /// Output container.
    pub format: String,
}

/// Body of a chat completions request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model name.
    pub model: String,
    /// Output modalities; omitted for text-only models.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modalities: Vec<String>,
    /// Audio output settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioOptions>,
    /// Conversation so far.
    pub messages: Vec<ChatMessage>,
    /// Function definitions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    /// `required` forces a tool call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

/// Body of a chat completions response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Candidate completions; only the first is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ResponseMessage,
}

/// A generated assistant message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    /// Text content, absent for audio or tool-call replies.
    #[serde(default)]
    pub content: Option<String>,
    /// Spoken reply.
    #[serde(default)]
    pub audio: Option<ResponseAudio>,
    /// Function calls.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// Audio attached to a generated message.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseAudio {
    /// Base64 audio.
    #[serde(default)]
    pub data: Option<String>,
    /// What was said.
    #[serde(default)]
    pub transcript: Option<String>,
}

/// A function call made by the model.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    /// The called function.
    pub function: FunctionCall,
}

/// Name and JSON-encoded arguments of a call.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// Arguments as a JSON string.
    pub arguments: String,
}

fn spoken(model: &str, persona: &Persona, messages: Vec<ChatMessage>) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        modalities: vec!["text".to_string(), "audio".to_string()],
        audio: Some(AudioOptions {
            voice: persona.voice.as_str().to_string(),
            format: "wav".to_string(),
        }),
        messages,
        tools: Vec::new(),
        tool_choice: None,
    }
}

fn tool_call(model: &str, messages: Vec<ChatMessage>, tool: Value) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        modalities: Vec::new(),
        audio: None,
        messages,
        tools: vec![tool],
        tool_choice: Some("required".to_string()),
    }
}

/// Request for the fictional company.
pub fn build_company_request(config: &DialogueConfig) -> ChatRequest {
    tool_call(
        &config.setup_model,
        vec![ChatMessage::system(company_prompt())],
        company_tool(),
    )
}

/// Request for a reporter's opening question, spoken in the persona's voice.
pub fn build_opening_request(
    config: &DialogueConfig,
    persona: &Persona,
    company: &CompanyProfile,
) -> ChatRequest {
    spoken(
        &config.dialogue_model,
        persona,
        vec![ChatMessage::system(opening_prompt(persona, company))],
    )
}

/// Request that scores the latest answer in `conversation`.
pub fn build_evaluation_request(
    config: &DialogueConfig,
    persona: &Persona,
    company: &CompanyProfile,
    conversation: &[ChatMessage],
) -> ChatRequest {
    let mut messages = vec![ChatMessage::system(followup_prompt(persona, company))];
    messages.extend_from_slice(conversation);
    tool_call(&config.dialogue_model, messages, evaluation_tool())
}

/// Request for the reporter's response, with a closing instruction when the
/// exchange is over.
pub fn build_reply_request(
    config: &DialogueConfig,
    persona: &Persona,
    company: &CompanyProfile,
    conversation: &[ChatMessage],
    end_of_conversation: bool,
) -> ChatRequest {
    let mut messages = vec![ChatMessage::system(followup_prompt(persona, company))];
    messages.extend_from_slice(conversation);
    if end_of_conversation {
        messages.push(ChatMessage::system(closing_instruction(persona)));
    }
    spoken(&config.dialogue_model, persona, messages)
}

fn first_message(response: &ChatResponse) -> DialogueResult<&ResponseMessage> {
    response
        .choices
        .first()
        .map(|c| &c.message)
        .ok_or_else(|| DialogueError::MalformedResponse("no choices in response".to_string()))
}

/// Arguments of the first call to `name`.
pub fn extract_tool_arguments<'a>(
    response: &'a ChatResponse,
    name: &'static str,
) -> DialogueResult<&'a str> {
    first_message(response)?
        .tool_calls
        .iter()
        .find(|call| call.function.name == name)
        .map(|call| call.function.arguments.as_str())
        .ok_or(DialogueError::MissingToolCall(name))
}

/// The spoken reply, falling back to text content when there is no audio.
pub fn extract_reply(response: &ChatResponse) -> DialogueResult<Reply> {
    let message = first_message(response)?;
    let audio = message.audio.as_ref();
    let transcript = audio
        .and_then(|a| a.transcript.clone())
        .or_else(|| message.content.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| DialogueError::MalformedResponse("reply has no transcript".to_string()))?;
    Ok(Reply {
        transcript,
        audio_base64: audio.and_then(|a| a.data.clone()),
    })
}

/// [`DialogueService`] backed by an OpenAI-compatible HTTP endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiDialogue {
    client: Client,
    config: DialogueConfig,
}

impl OpenAiDialogue {
    /// Build the HTTP client.
    pub fn new(config: DialogueConfig) -> DialogueResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    async fn send(&self, request: &ChatRequest) -> DialogueResult<ChatResponse> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion"
        );
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion rejected");
            return Err(DialogueError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| DialogueError::MalformedResponse(format!("unreadable body: {e}")))
    }
}

impl DialogueService for OpenAiDialogue {
    async fn company_profile(&self) -> DialogueResult<CompanyProfile> {
        let response = self.send(&build_company_request(&self.config)).await?;
        parse_company(extract_tool_arguments(&response, COMPANY_TOOL)?)
    }

    async fn opening_question(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
    ) -> DialogueResult<Reply> {
        let request = build_opening_request(&self.config, persona, company);
        extract_reply(&self.send(&request).await?)
    }

    async fn evaluate(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
        conversation: &[ChatMessage],
    ) -> DialogueResult<Evaluation> {
        let request = build_evaluation_request(&self.config, persona, company, conversation);
        let response = self.send(&request).await?;
        let evaluation = parse_evaluation(extract_tool_arguments(&response, EVALUATION_TOOL)?)?;
        debug!(
            reporter = %persona.name,
            score = evaluation.score,
            end = evaluation.end_of_conversation,
            "answer evaluated"
        );
        Ok(evaluation)
    }

    async fn reply(
        &self,
        persona: &Persona,
        company: &CompanyProfile,
        conversation: &[ChatMessage],
        end_of_conversation: bool,
    ) -> DialogueResult<Reply> {
        let request = build_reply_request(
            &self.config,
            persona,
            company,
            conversation,
            end_of_conversation,
        );
        extract_reply(&self.send(&request).await?)
    }
}
