// src/services/completion.rs

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    config::CompletionConfig,
    error::{ConfigError, ScoringError},
};

const SYSTEM_PROMPT: &str = "You are a teacher grading short quiz answers. \
                             Reply with JSON only.";

/// Builds the grading prompt for one answer.
pub fn grading_prompt(question: &str, answer: &str) -> String {
    format!(
        "Grade the following student answer.\n\
         Question: {question}\n\
         Student answer: {answer}\n\n\
         Respond with a JSON object of the form \
         {{\"correct\": true or false, \"feedback\": \"one or two sentences for the student\"}}."
    )
}

/// A chat-completion backend that turns one prompt into the model's reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ScoringError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client.
/// One `reqwest::Client` (and its connection pool) is shared by every call.
pub struct OpenAiClient {
    client: Client,
    endpoint: Url,
    config: CompletionConfig,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Result<Self, ConfigError> {
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join("chat/completions"))
            .map_err(|e| {
                ConfigError::Invalid(format!("OPENAI_BASE_URL '{}': {}", config.base_url, e))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ScoringError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ScoringError::MissingCredential)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScoringError::Status(status.as_u16(), body));
        }

        let body = response.text().await?;
        let envelope: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ScoringError::MalformedResponse(format!("completion envelope: {}", e)))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScoringError::MalformedResponse("no choices in response".to_string()))
    }
}

/// The model's judgement of one answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    pub feedback: String,
}

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced JSON pattern is valid")
});

/// Parses the verdict out of the reply text.
/// Accepts bare JSON or JSON inside a Markdown code fence.
pub fn extract_verdict(content: &str) -> Result<Verdict, ScoringError> {
    let trimmed = content.trim();
    let json = FENCED_JSON
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    serde_json::from_str(json).map_err(|e| ScoringError::MalformedResponse(e.to_string()))
}
