//! HTTP client for the Zap AI proxy
//!
//! Two endpoints: `/transcribe` takes a multipart audio upload and returns
//! `{"text": ...}`; `/chat` takes a system+user message pair and returns a
//! chat-completion payload. Error bodies carry `{"error": ...}`.

use super::config::ProxyConfig;
use super::prompts;
use super::{OrganizationService, SummarizationService, TranscriptionService};
use crate::{Result, ZapError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct OrganizedEntry {
    content: String,
}

/// Client for the AI proxy, implementing the full enrichment capability set
#[derive(Debug, Clone)]
pub struct ProxyClient {
    config: ProxyConfig,
    http: reqwest::Client,
}

impl ProxyClient {
    /// Build a client from the given configuration
    pub fn new(config: ProxyConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Turn a non-success response into a human-readable proxy error
    async fn error_from_response(response: reqwest::Response) -> ZapError {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => ZapError::ProxyError(body.error),
            Err(_) => ZapError::ProxyError(format!("Server error (status {})", status.as_u16())),
        }
    }

    /// Issue a system+user chat completion and return the reply content
    async fn chat(&self, system: &str, user: String) -> Result<String> {
        let request = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(self.endpoint("chat"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ZapError::ParseError(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ZapError::ParseError("chat response had no choices".to_string()))
    }
}

/// Parse an organize reply into task entries.
///
/// Code fences around the array are tolerated; any other deviation from the
/// contract degrades to an empty set rather than failing the operation.
fn parse_organized(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    match serde_json::from_str::<Vec<OrganizedEntry>>(stripped) {
        Ok(entries) => entries.into_iter().map(|entry| entry.content).collect(),
        Err(e) => {
            warn!("Organize reply was not a task array, using empty plan: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl TranscriptionService for ProxyClient {
    async fn transcribe(&self, file_name: &str, audio: Vec<u8>) -> Result<String> {
        debug!("Uploading {} bytes for transcription", audio.len());

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/mpeg")
            .map_err(|e| ZapError::TranscriptionError(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());

        let response = self
            .http
            .post(self.endpoint("transcribe"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ZapError::ParseError(e.to_string()))?;
        Ok(body.text)
    }
}

#[async_trait]
impl SummarizationService for ProxyClient {
    async fn summarize(&self, digest: &str) -> Result<String> {
        self.chat(
            prompts::SUMMARIZE_SYSTEM_PROMPT,
            prompts::summarize_user_prompt(digest),
        )
        .await
    }
}

#[async_trait]
impl OrganizationService for ProxyClient {
    async fn organize(&self, digest: &str) -> Result<Vec<String>> {
        let reply = self
            .chat(
                prompts::ORGANIZE_SYSTEM_PROMPT,
                prompts::organize_user_prompt(digest),
            )
            .await?;
        Ok(parse_organized(&reply))
    }
}
