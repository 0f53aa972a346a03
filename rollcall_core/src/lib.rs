#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod intake;
pub mod prompt;
pub mod student;
pub mod validate;

pub use error::IntakeError;
pub use intake::StudentIntake;
pub use student::{NewStudent, StudentRecord, StudentRepo};

/// MIME type requested from the model for structured output.
pub const JSON_MIME_TYPE: &str = "application/json";

/// A single prompt sent to a language model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model: String,
    /// Advisory output format. Providers forward it when the API supports
    /// one, but callers must still treat the reply as untrusted text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<LLMResponse>;
    fn get_default_model(&self) -> &str;
}

#[async_trait]
impl<T: LLMProvider + ?Sized> LLMProvider for Box<T> {
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<LLMResponse> {
        (**self).generate(request).await
    }

    fn get_default_model(&self) -> &str {
        (**self).get_default_model()
    }
}
