use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntakeError>;

/// Every way a submission can fail. Each failure ends the request.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("All fields required")]
    MissingFields,

    #[error("Roll number must be an integer")]
    InvalidRollNumber,

    #[error("Text is required")]
    MissingText,

    /// The model replied with something that is not JSON.
    #[error("AI response invalid")]
    AiResponseInvalid { raw: String },

    /// The model replied with JSON that does not describe a student.
    #[error("Incomplete or invalid data from AI")]
    IncompleteAiData { data: Value },

    /// Model transport failure, or a storage failure on the AI path.
    #[error("AI request failed")]
    AiRequestFailed(#[source] anyhow::Error),

    /// Storage failure on the direct path.
    #[error("Server error")]
    Storage(#[source] anyhow::Error),
}

impl IntakeError {
    /// True for errors caused by the caller's input or by the model's output
    /// failing validation, as opposed to a server-side fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields | Self::InvalidRollNumber | Self::MissingText | Self::IncompleteAiData { .. }
        )
    }
}
