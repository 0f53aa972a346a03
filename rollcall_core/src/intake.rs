//! Submission dispatch and the AI extraction pipeline.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{IntakeError, Result};
use crate::prompt::build_extraction_prompt;
use crate::student::{StudentRecord, StudentRepo};
use crate::validate::{parse_model_output, require_text, validate_extraction, validate_submission};
use crate::{GenerateRequest, JSON_MIME_TYPE, LLMProvider};

/// An inbound request body, tagged with the path it arrived on.
#[derive(Debug, Clone)]
pub enum Submission {
    /// Three pre-filled form fields.
    Form(Value),
    /// `{ "text": ... }` carrying an utterance transcript.
    Utterance(Value),
}

/// Turns submissions into stored student records.
///
/// Holds no per-request state; one instance is shared by every request.
pub struct StudentIntake<P, R> {
    provider: P,
    repo: R,
    model: String,
}

impl<P, R> StudentIntake<P, R>
where
    P: LLMProvider,
    R: StudentRepo,
{
    pub fn new(provider: P, repo: R) -> Self {
        let model = provider.get_default_model().to_string();
        Self {
            provider,
            repo,
            model,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Route a submission to the direct path or the extraction pipeline.
    pub async fn dispatch(&self, submission: Submission) -> Result<StudentRecord> {
        match submission {
            Submission::Form(body) => self.submit(&body).await,
            Submission::Utterance(body) => {
                let text = require_text(&body)?;
                self.extract(text).await
            }
        }
    }

    /// Validate form fields and store them without consulting the model.
    pub async fn submit(&self, body: &Value) -> Result<StudentRecord> {
        let student = validate_submission(body)?;
        let record = self
            .repo
            .create(&student)
            .await
            .map_err(IntakeError::Storage)?;
        info!("Stored submitted student {}", record.id);
        Ok(record)
    }

    /// Extract student details from a transcript and store them.
    ///
    /// Makes exactly one model call. The reply is parsed as plain JSON and
    /// checked field by field before anything reaches the store.
    #[tracing::instrument(skip(self, text), fields(model = %self.model))]
    pub async fn extract(&self, text: &str) -> Result<StudentRecord> {
        if text.is_empty() {
            return Err(IntakeError::MissingText);
        }

        let request = GenerateRequest {
            prompt: build_extraction_prompt(text),
            model: self.model.clone(),
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
        };

        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(IntakeError::AiRequestFailed)?;

        if let Some(usage) = &response.usage {
            debug!(
                "Model usage: prompt={} completion={} total={}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let parsed = parse_model_output(&response.content).inspect_err(|_| {
            warn!("Model returned non-JSON output");
        })?;
        let student = validate_extraction(parsed).inspect_err(|_| {
            warn!("Model output failed validation");
        })?;

        let record = self
            .repo
            .create(&student)
            .await
            .map_err(IntakeError::AiRequestFailed)?;
        info!("Stored extracted student {}", record.id);
        Ok(record)
    }
}
