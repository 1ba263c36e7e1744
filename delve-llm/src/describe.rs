//! Bridge from the async LLM client into the synchronous core.
//!
//! The core engine is deliberately synchronous; [`LlmDescriber`] owns a
//! single-thread tokio runtime and blocks on each batch call, so the dungeon
//! orchestrator can treat the network backend like any other collaborator.

use tracing::debug;

use delve_core::describe::{DescribeError, DescribeRequest, Describer, RoomDescription};

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::parse::parse_batch;
use crate::prompt::{PromptTemplate, render_batch};
use crate::types::LlmRequest;

/// A [`Describer`] backed by a remote language model.
pub struct LlmDescriber {
    client: LlmClient,
    template: PromptTemplate,
    runtime: tokio::runtime::Runtime,
}

impl LlmDescriber {
    /// Create a describer over the given client with the built-in prompt.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` if the tokio runtime cannot be built.
    pub fn new(client: LlmClient) -> Result<Self, LlmError> {
        Self::with_template(client, PromptTemplate::builtin())
    }

    /// Create a describer with a custom prompt template.
    ///
    /// # Errors
    /// Returns `LlmError::ConfigError` if the tokio runtime cannot be built.
    pub fn with_template(client: LlmClient, template: PromptTemplate) -> Result<Self, LlmError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::ConfigError(format!("failed to build runtime: {e}")))?;
        Ok(Self {
            client,
            template,
            runtime,
        })
    }
}

impl Describer for LlmDescriber {
    fn describe(
        &mut self,
        request: &DescribeRequest,
    ) -> Result<Vec<RoomDescription>, DescribeError> {
        let (system, user) = render_batch(&self.template, request)
            .map_err(|e| DescribeError::Backend(e.to_string()))?;
        let llm_request = LlmRequest::describe_batch(system, user);

        let response = self
            .runtime
            .block_on(self.client.generate(&llm_request))
            .map_err(|e| DescribeError::Backend(e.to_string()))?;
        debug!(
            model = %response.model,
            tokens = response.tokens_generated,
            latency_ms = response.latency_ms,
            rooms = request.stubs.len(),
            "description batch answered"
        );

        parse_batch(&response.text).map_err(|e| match e {
            LlmError::ParseError(_) | LlmError::ShapeRejected(_) => {
                DescribeError::InvalidBatch(e.to_string())
            }
            other => DescribeError::Backend(other.to_string()),
        })
    }
}
