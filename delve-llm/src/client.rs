//! LLM client — unified interface for Ollama and OpenAI-compatible backends.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{LlmRequest, LlmResponse};

/// Provider backend for LLM inference.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Ollama running locally (recommended).
    Ollama {
        /// Base URL, e.g. `http://localhost:11434`.
        base_url: String,
        /// Model name, e.g. `llama3.1`.
        model: String,
    },
    /// OpenAI-compatible API (also works with Together, vLLM, etc.).
    OpenAiCompatible {
        /// Base URL up to but excluding `/v1`.
        base_url: String,
        /// Bearer token.
        api_key: String,
        /// Model name.
        model: String,
    },
    /// No LLM available — all calls return error, triggering stub fallback.
    None,
}

/// The LLM client that routes requests to the configured backend.
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    max_retries: u32,
}

impl LlmClient {
    /// Create a new LLM client.
    #[must_use]
    pub fn new(provider: LlmProvider, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            max_retries,
        }
    }

    /// Create a client with no backend (all calls fail → stub fallback).
    #[must_use]
    pub fn none() -> Self {
        Self {
            provider: LlmProvider::None,
            http: Client::new(),
            max_retries: 0,
        }
    }

    /// Whether a backend is configured at all.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a response from the LLM.
    ///
    /// # Errors
    /// Returns `Err` if no backend is configured or all retries fail. The
    /// caller should fall back to stub descriptions on error.
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("no LLM provider configured".into())),
            LlmProvider::Ollama { base_url, model } => {
                self.generate_ollama(base_url, model, request).await
            }
            LlmProvider::OpenAiCompatible {
                base_url,
                api_key,
                model,
            } => {
                self.generate_openai(base_url, api_key, model, request)
                    .await
            }
        }
    }

    /// Generate using Ollama's API.
    async fn generate_ollama(
        &self,
        base_url: &str,
        model: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/api/generate");
        let mut body = json!({
            "model": model,
            "prompt": format!("{}\n\n{}", request.system, request.user),
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            }
        });
        if request.json_mode {
            body["format"] = json!("json");
        }

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    "retrying Ollama call (attempt {}/{})",
                    attempt + 1,
                    self.max_retries + 1
                );
            }

            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let json: serde_json::Value = resp
                            .json()
                            .await
                            .map_err(|e| LlmError::ParseError(e.to_string()))?;

                        let text = json["response"].as_str().unwrap_or("").to_string();
                        let tokens =
                            u32::try_from(json["eval_count"].as_u64().unwrap_or(0)).unwrap_or(0);

                        return Ok(LlmResponse {
                            text,
                            tokens_generated: tokens,
                            latency_ms,
                            model: model.to_string(),
                        });
                    }
                    last_error = format!(
                        "HTTP {}: {}",
                        resp.status(),
                        resp.text().await.unwrap_or_default()
                    );
                    warn!("Ollama returned error: {}", last_error);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() {
                        warn!("Ollama request timed out after {}ms", request.timeout_ms);
                    } else {
                        warn!("Ollama request failed: {}", last_error);
                    }
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }

    /// Generate using an OpenAI-compatible API.
    async fn generate_openai(
        &self,
        base_url: &str,
        api_key: &str,
        model: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{base_url}/v1/chat/completions");
        let mut body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    "retrying OpenAI call (attempt {}/{})",
                    attempt + 1,
                    self.max_retries + 1
                );
            }

            let start = Instant::now();
            let result = self
                .http
                .post(&url)
                .header("Authorization", format!("Bearer {api_key}"))
                .json(&body)
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let json: serde_json::Value = resp
                            .json()
                            .await
                            .map_err(|e| LlmError::ParseError(e.to_string()))?;

                        let text = json["choices"][0]["message"]["content"]
                            .as_str()
                            .unwrap_or("")
                            .to_string();
                        let tokens = u32::try_from(
                            json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
                        )
                        .unwrap_or(0);

                        return Ok(LlmResponse {
                            text,
                            tokens_generated: tokens,
                            latency_ms,
                            model: model.to_string(),
                        });
                    }
                    last_error = format!("HTTP {}", resp.status());
                    warn!("OpenAI API returned error: {}", last_error);
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!("OpenAI API request failed: {}", last_error);
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }
}
