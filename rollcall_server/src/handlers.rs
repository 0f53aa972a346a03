use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use rollcall_core::intake::Submission;
use rollcall_core::{LLMProvider, StudentIntake, StudentRecord, StudentRepo};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::ApiError;

/// Body of every successful submission.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: StudentRecord,
}

/// A missing or malformed body reads as `{}` so that it fails field
/// validation with the usual message.
fn body_json(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!("Treating unreadable request body as empty: {e}");
        Value::Object(Map::new())
    })
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST /submit
pub async fn submit<P, R>(
    State(intake): State<Arc<StudentIntake<P, R>>>,
    body: Bytes,
) -> Result<Json<SavedResponse>, ApiError>
where
    P: LLMProvider + 'static,
    R: StudentRepo + 'static,
{
    let record = intake.dispatch(Submission::Form(body_json(&body))).await?;
    Ok(Json(SavedResponse {
        success: true,
        message: "Data saved successfully",
        data: record,
    }))
}

/// POST /ai
pub async fn ai<P, R>(
    State(intake): State<Arc<StudentIntake<P, R>>>,
    body: Bytes,
) -> Result<Json<SavedResponse>, ApiError>
where
    P: LLMProvider + 'static,
    R: StudentRepo + 'static,
{
    let record = intake
        .dispatch(Submission::Utterance(body_json(&body)))
        .await?;
    Ok(Json(SavedResponse {
        success: true,
        message: "AI auto-submitted form",
        data: record,
    }))
}
