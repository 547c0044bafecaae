use crate::backend::{AttendanceBackend, BackendError};
use crate::model::attendance::RegularizationPayload;
use crate::models::RegularizationForm;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};
use utoipa::ToSchema;

static REASON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 ]+$").expect("reason pattern is a valid regex"));

#[derive(Debug, Error)]
pub enum RegularizationError {
    #[error("date and reason are required")]
    FormInvalid,
    #[error("reason may contain only letters, digits and spaces")]
    ReasonPatternInvalid,
    #[error("{date} is outside {min}..={max}")]
    DateOutOfWindow {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Inclusive range of dates a correction may target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegularizationWindow {
    #[schema(value_type = String, format = "date", example = "2026-01-01")]
    pub min: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2026-01-15")]
    pub max: NaiveDate,
}

impl RegularizationWindow {
    /// First of the current month up to and including today
    pub fn for_today(today: NaiveDate) -> Self {
        let min = today.with_day(1).unwrap_or(today);
        Self { min, max: today }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }
}

/// Truncates an over-long year while a date is being typed, e.g.
/// `20245-03-01` becomes `2024-03-01`. Anything else is left alone.
pub fn shape_date_input(raw: &str) -> String {
    if !raw.contains('-') {
        return raw.to_string();
    }
    let mut parts: Vec<&str> = raw.split('-').collect();
    let year = parts[0];
    if let Some((cut, _)) = year.char_indices().nth(4) {
        parts[0] = &year[..cut];
    }
    parts.join("-")
}

/// Checks a correction request against the window derived from `today`.
/// The reason is checked before the date.
pub fn validate(
    date: NaiveDate,
    reason: &str,
    today: NaiveDate,
) -> Result<RegularizationPayload, RegularizationError> {
    if !REASON_PATTERN.is_match(reason) {
        return Err(RegularizationError::ReasonPatternInvalid);
    }

    let window = RegularizationWindow::for_today(today);
    if !window.contains(date) {
        return Err(RegularizationError::DateOutOfWindow {
            date,
            min: window.min,
            max: window.max,
        });
    }

    Ok(RegularizationPayload {
        date,
        reason: reason.to_string(),
    })
}

/// Shapes, validates and forwards a typed form. Nothing reaches the backend
/// unless validation passes. Returns the validated payload and the backend's
/// message.
#[instrument(skip(backend, form), fields(date = %form.date))]
pub async fn submit(
    backend: &dyn AttendanceBackend,
    form: &RegularizationForm,
    today: NaiveDate,
) -> Result<(RegularizationPayload, String), RegularizationError> {
    let date = shape_date_input(form.date.trim());
    if date.is_empty() || form.reason.is_empty() {
        return Err(RegularizationError::FormInvalid);
    }
    let date =
        NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| RegularizationError::FormInvalid)?;

    let payload = validate(date, &form.reason, today)?;
    let message = backend.request_regularization(&payload).await?;
    info!(date = %payload.date, "regularization submitted");

    Ok((payload, message))
}
