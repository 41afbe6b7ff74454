//! Blocking chat-completions client implementing [`TextExtractor`].

use std::time::Duration;

use duedate_core::{ExtractError, TextExtractor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::prompt::{ReplyError, SYSTEM_PROMPT, build_user_prompt, parse_validity_reply};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply contained no choices")]
    EmptyReply,
    #[error(transparent)]
    Reply(#[from] ReplyError),
}

impl From<LlmError> for ExtractError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Http(ref err) if err.is_timeout() => ExtractError::Timeout,
            LlmError::Http(_) | LlmError::Server { .. } => ExtractError::Backend(e.to_string()),
            LlmError::Json(_) | LlmError::EmptyReply | LlmError::Reply(_) => {
                ExtractError::Malformed(e.to_string())
            }
        }
    }
}

/// Endpoint and model settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.groq.com/openai/v1`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Per-request timeout; a timed-out request is reported as no claim.
    pub timeout: Duration,
    pub temperature: f32,
}

impl LlmConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
            temperature: 0.0,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Text Extractor that asks a hosted model for the validity period.
pub struct LlmExtractor {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl LlmExtractor {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        info!(model = %config.model, base_url = %config.base_url, "initialised LLM extractor");
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            api_key: config.api_key,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send one system + user exchange and return the reply text.
    fn complete(&self, user_prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(LlmError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text()?;
        let parsed: ChatResponse = serde_json::from_str(&body)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyReply)
    }

    /// Extract a validity period, with errors in this crate's terms.
    pub fn extract_validity(
        &self,
        subject: &str,
        document_text: &str,
    ) -> Result<Option<String>, LlmError> {
        let reply = self.complete(&build_user_prompt(subject, document_text))?;
        let period = parse_validity_reply(&reply)?;
        debug!(subject, validity_period = ?period, "LLM validity reply parsed");
        Ok(period)
    }
}

impl TextExtractor for LlmExtractor {
    fn extract(&self, subject: &str, document_text: &str) -> Result<Option<String>, ExtractError> {
        Ok(self.extract_validity(subject, document_text)?)
    }
}
