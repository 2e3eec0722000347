//! Chat model backends
//!
//! Both backends take the whole transcript and return the assistant's reply.
//! Any transport, status or decoding failure surfaces as
//! [`ChatError::Gateway`]; retries are left to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::config::{LlmConfig, LlmProvider};
use crate::error::{ChatError, Result};
use crate::services::message::ChatMessage;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-3.5-turbo";
const OLLAMA_BASE_URL: &str = "http://localhost:11434";
const OLLAMA_MODEL: &str = "llama2";

/// Chat model that answers the latest user message given the transcript
#[async_trait]
pub trait ChatGateway: Send + Sync {
  async fn respond(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Build the gateway selected by `config.provider`
pub fn build_gateway(config: &LlmConfig) -> Result<Arc<dyn ChatGateway>> {
  let gateway: Arc<dyn ChatGateway> = match config.provider {
    LlmProvider::OpenAi => Arc::new(OpenAiGateway::new(config)?),
    LlmProvider::Ollama => Arc::new(OllamaGateway::new(config)?),
  };
  Ok(gateway)
}

fn http_client(config: &LlmConfig) -> Result<Client> {
  Ok(Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?)
}

fn gateway_error(backend: &str, e: impl std::fmt::Display) -> ChatError {
  error!(backend, error = %e, "Chat backend request failed");
  ChatError::Gateway(e.to_string())
}

// OpenAI-compatible Backend
// =========================

#[derive(Debug, Deserialize)]
struct CompletionResponse {
  choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
  message: ChatMessage,
}

pub struct OpenAiGateway {
  client: Client,
  endpoint: String,
  model: String,
  api_key: Option<String>,
  max_tokens: u32,
  temperature: f32,
}

impl OpenAiGateway {
  pub fn new(config: &LlmConfig) -> Result<Self> {
    let base_url = config.base_url.as_deref().unwrap_or(OPENAI_BASE_URL).trim_end_matches('/');
    Ok(Self {
      client: http_client(config)?,
      endpoint: format!("{base_url}/chat/completions"),
      model: config.model.clone().unwrap_or_else(|| OPENAI_MODEL.to_string()),
      api_key: config.api_key.clone(),
      max_tokens: config.max_tokens,
      temperature: config.temperature,
    })
  }
}

#[async_trait]
impl ChatGateway for OpenAiGateway {
  async fn respond(&self, messages: &[ChatMessage]) -> Result<String> {
    debug!(model = %self.model, messages = messages.len(), "Requesting chat completion");

    let body = json!({
      "model": self.model,
      "messages": messages,
      "max_tokens": self.max_tokens,
      "temperature": self.temperature,
    });

    let mut request = self.client.post(&self.endpoint).json(&body);
    if let Some(api_key) = &self.api_key {
      request = request.bearer_auth(api_key);
    }

    let response: CompletionResponse = request
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|e| gateway_error("openai", e))?
      .json()
      .await
      .map_err(|e| gateway_error("openai", e))?;

    response
      .choices
      .into_iter()
      .next()
      .map(|choice| choice.message.content().to_string())
      .ok_or_else(|| gateway_error("openai", "response contained no choices"))
  }
}

// Ollama Backend
// ==============

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
  model: &'a str,
  messages: &'a [ChatMessage],
  stream: bool,
  options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
  temperature: f32,
  num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
  message: ChatMessage,
}

pub struct OllamaGateway {
  client: Client,
  endpoint: String,
  model: String,
  max_tokens: u32,
  temperature: f32,
}

impl OllamaGateway {
  pub fn new(config: &LlmConfig) -> Result<Self> {
    let base_url = config.base_url.as_deref().unwrap_or(OLLAMA_BASE_URL).trim_end_matches('/');
    Ok(Self {
      client: http_client(config)?,
      endpoint: format!("{base_url}/api/chat"),
      model: config.model.clone().unwrap_or_else(|| OLLAMA_MODEL.to_string()),
      max_tokens: config.max_tokens,
      temperature: config.temperature,
    })
  }
}

#[async_trait]
impl ChatGateway for OllamaGateway {
  async fn respond(&self, messages: &[ChatMessage]) -> Result<String> {
    debug!(model = %self.model, messages = messages.len(), "Requesting Ollama chat");

    let body = OllamaRequest {
      model: &self.model,
      messages,
      stream: false,
      options: OllamaOptions { temperature: self.temperature, num_predict: self.max_tokens },
    };

    let response: OllamaResponse = self
      .client
      .post(&self.endpoint)
      .json(&body)
      .send()
      .await
      .and_then(|r| r.error_for_status())
      .map_err(|e| gateway_error("ollama", e))?
      .json()
      .await
      .map_err(|e| gateway_error("ollama", e))?;

    Ok(response.message.content().to_string())
  }
}
