//! Configuration for the AI proxy client

use crate::{Result, ZapError};
use std::time::Duration;

/// Environment variable holding the proxy credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the proxy base URL
pub const BASE_URL_ENV: &str = "ZAP_PROXY_URL";

const DEFAULT_BASE_URL: &str = "https://api.zap.zigao.wang/api/openai";

/// Configuration for [`super::ProxyClient`]
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    /// Base URL of the AI proxy (`/transcribe` and `/chat` are appended)
    pub base_url: String,

    /// Bearer credential forwarded to the proxy
    pub api_key: String,

    /// Model used for chat-based enrichment (summarize, organize)
    pub chat_model: String,

    /// Model used for audio transcription
    pub transcription_model: String,

    /// Token budget for chat responses
    pub max_tokens: usize,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ProxyConfig {
    /// Create a configuration with the given credential and defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            chat_model: "gpt-4o-mini".to_string(),
            transcription_model: "whisper-1".to_string(),
            max_tokens: 150,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// Requires `OPENAI_API_KEY`; honors `ZAP_PROXY_URL` when set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| ZapError::ConfigError(format!("{} not set", API_KEY_ENV)))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Set the proxy base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the chat model
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Set the transcription model
    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// Set the chat response token budget
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ZapError::ConfigError("API key is empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(ZapError::ConfigError("base URL is empty".to_string()));
        }
        Ok(())
    }
}
