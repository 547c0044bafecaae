use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "6f1c0a52-3f0e-4d8e-9a43-1f1f2b7f8c10",
    "severity": "success",
    "summary": "Clock-in Successful",
    "detail": "Checked in successfully at 09:02. Have a great day!",
    "created_at": "2026-01-01T09:02:11Z"
}))]
pub struct Notification {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(severity: Severity, summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            summary: summary.into(),
            detail: detail.into(),
            created_at: Utc::now(),
        }
    }

    pub fn success(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Success, summary, detail)
    }

    pub fn warn(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Warn, summary, detail)
    }

    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(Severity::Error, summary, detail)
    }
}
