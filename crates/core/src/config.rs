//! Configuration for the translation endpoint.
//!
//! The credential is resolved once, into an explicit object, and checked
//! before any client is built.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model name.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

fn default_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout_secs() -> u64 {
    120
}

/// Settings for the chat-completions translation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// API credential. Required.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API, without the trailing route.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f32>,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslatorConfig {
    /// Overlay the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::Configuration(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Overlay values found through `lookup` (normally the environment).
    ///
    /// Blank values are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(key) = get(API_KEY_VAR) {
            self.api_key = Some(key);
        }
        if let Some(model) = get(MODEL_VAR) {
            self.model = model;
        }
        if let Some(url) = get(BASE_URL_VAR) {
            self.base_url = url;
        }
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check that the config can drive a client.
    ///
    /// Returns the credential so callers do not have to unwrap it again.
    pub fn validate(&self) -> Result<&str> {
        let key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Configuration(format!("{} not set", API_KEY_VAR)))?;

        if self.model.trim().is_empty() {
            return Err(Error::Configuration("model name is empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Configuration(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.max_tokens == 0 {
            return Err(Error::Configuration("max_tokens must be positive".to_string()));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(Error::Configuration(format!(
                    "temperature must be within 0.0..=2.0, got {}",
                    t
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::Configuration("timeout_secs must be positive".to_string()));
        }

        Ok(key)
    }
}
