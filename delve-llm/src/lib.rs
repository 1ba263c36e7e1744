//! # delve-llm — LLM Description Backend for Delve
//!
//! Turns batches of room stubs into narrated names and descriptions via a
//! remote language model. Supported backends:
//!   - **Ollama** (local, recommended default)
//!   - **OpenAI-compatible API** (also works with Together, vLLM, etc.)
//!
//! All LLM traffic in Delve goes through this crate, ensuring:
//!   - JSON output enforcement and tolerant response parsing
//!   - Timeout management
//!   - Retry with bounded attempts
//!   - Graceful degradation — the core engine falls back to stub text when
//!     this crate reports failure, so a dead backend never blocks generation
//!
//! The bridge into the synchronous core is [`describe::LlmDescriber`], which
//! implements `delve_core::describe::Describer` over an owned single-thread
//! tokio runtime.

pub mod client;
pub mod describe;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use describe::LlmDescriber;
pub use error::LlmError;
pub use types::{LlmRequest, LlmResponse};
