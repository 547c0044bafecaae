//! Attendance backend collaborator.
//!
//! The dashboard never decides on its own whether a clock-in or clock-out is
//! permitted; it forwards the action and reports what the backend answered.

pub mod http;

use crate::model::attendance::{AttendanceStatus, ClockInPayload, RegularizationPayload};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpAttendanceBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status
    #[error("backend rejected the request ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Message to show the user, `fallback` when the backend gave none
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Rejected { message: Some(m), .. } => m.clone(),
            _ => fallback.to_string(),
        }
    }

    /// The backend's wording for a second same-day clock-in.
    // TODO: switch to a structured error code once the backend exposes one
    pub fn is_already_clocked_in(&self) -> bool {
        match self {
            BackendError::Rejected { message: Some(m), .. } => {
                m.to_lowercase().contains("already clocked in")
            }
            _ => false,
        }
    }
}

#[async_trait]
pub trait AttendanceBackend: Send + Sync {
    /// Today's attendance record for the authenticated employee
    async fn current_status(&self) -> Result<AttendanceStatus, BackendError>;

    async fn clock_in(&self, payload: &ClockInPayload) -> Result<String, BackendError>;

    async fn clock_out(&self) -> Result<String, BackendError>;

    async fn request_regularization(
        &self,
        payload: &RegularizationPayload,
    ) -> Result<String, BackendError>;
}

/// Pulls the human readable message out of a response body.
///
/// A JSON object yields its `message` field, a JSON string yields itself and
/// anything else non-empty is taken as plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string),
        Ok(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Ok(Value::String(_)) | Ok(Value::Null) => None,
        _ => Some(body.to_string()),
    }
}
