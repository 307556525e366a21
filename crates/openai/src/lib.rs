//! OpenAI-compatible chat-completions client, used as the text translator.
//!
//! One blocking request per text unit. Errors are returned to the caller,
//! which decides whether to fall back to the original text.

use doctrans_core::prompt::{system_prompt, user_prompt};
use doctrans_core::{Error, Result, TextTranslator, TranslatorConfig};
use reqwest::blocking::Client;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat-completions request body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: String) -> Self {
        Self {
            role: role.to_string(),
            content,
        }
    }
}

/// Chat-completions response, reduced to what translation needs.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, trimmed. Blank answers are errors.
    pub fn into_text(self) -> Result<String> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(Error::Translation("empty completion".to_string()));
        }
        Ok(content)
    }
}

/// Blocking client for one configured endpoint and model.
pub struct OpenAiTranslator {
    client: Client,
    config: TranslatorConfig,
    api_key: String,
}

impl OpenAiTranslator {
    /// Build a client. Fails with `Error::Configuration` when the credential
    /// is missing or the config is otherwise unusable.
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let api_key = config.validate()?.to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Full URL of the completions route.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Request body for translating `text` into `target_language`.
    pub fn build_request(&self, text: &str, target_language: &str) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::new("system", system_prompt(target_language)),
                ChatMessage::new("user", user_prompt(target_language, text)),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .map_err(|e| Error::Translation(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::Translation(format!("API error ({}): {}", status, body)));
        }

        response
            .json::<ChatResponse>()
            .map_err(|e| Error::Translation(format!("Failed to parse response: {}", e)))
    }
}

impl TextTranslator for OpenAiTranslator {
    fn translate(&mut self, text: &str, target_language: &str) -> Result<String> {
        let request = self.build_request(text, target_language);
        log::debug!(
            "Translating {} chars to {} with {}",
            text.chars().count(),
            target_language,
            self.config.model
        );
        self.complete(&request)?.into_text()
    }
}
