use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rollcall_core::IntakeError;
use serde_json::json;
use tracing::{error, warn};

/// HTTP view of an [`IntakeError`].
///
/// Server-side faults are reported without internal detail; the cause is
/// only written to the log.
#[derive(Debug)]
pub struct ApiError(pub IntakeError);

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        Self(err)
    }
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        let body = match self.0 {
            IntakeError::AiResponseInvalid { raw } => {
                error!("{message}: {raw}");
                json!({ "error": message, "raw": raw })
            }
            IntakeError::IncompleteAiData { data } => {
                warn!("{message}: {data}");
                json!({ "error": message, "data": data })
            }
            IntakeError::AiRequestFailed(cause) | IntakeError::Storage(cause) => {
                error!("{message}: {cause:#}");
                json!({ "error": message })
            }
            IntakeError::MissingFields | IntakeError::InvalidRollNumber | IntakeError::MissingText => {
                warn!("Rejected request: {message}");
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
