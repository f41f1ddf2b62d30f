//! Configuration for the dialogue service.

use std::time::Duration;

use crate::error::{DialogueError, DialogueResult};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the reporter dialogue model.
pub const DIALOGUE_MODEL_VAR: &str = "PN_DIALOGUE_MODEL";
/// Environment variable overriding the company setup model.
pub const SETUP_MODEL_VAR: &str = "PN_SETUP_MODEL";

/// Credentials and model selection for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Bearer token for the API.
    pub api_key: String,
    /// Base URL, without a trailing slash (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Audio-capable model that plays the reporters.
    pub dialogue_model: String,
    /// Text model that invents the company at game start.
    pub setup_model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DialogueConfig {
    /// Build a config with default endpoint and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            dialogue_model: "gpt-4o-audio-preview".to_string(),
            setup_model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Read the config from the process environment.
    pub fn from_env() -> DialogueResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the config through an arbitrary key lookup.
    ///
    /// The API key is required; blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DialogueResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(DialogueError::MissingCredential(API_KEY_VAR))?;
        let mut config = Self::new(api_key);
        if let Some(url) = get(BASE_URL_VAR) {
            config = config.with_base_url(url);
        }
        if let Some(model) = get(DIALOGUE_MODEL_VAR) {
            config.dialogue_model = model;
        }
        if let Some(model) = get(SETUP_MODEL_VAR) {
            config.setup_model = model;
        }
        Ok(config)
    }

    /// Point at a different endpoint. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
