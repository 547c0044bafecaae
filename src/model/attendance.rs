use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Employee reference embedded in the current-day attendance record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRef {
    pub emp_id: u64,
}

/// Current-day attendance record as returned by the backend.
///
/// `clock_in_time` / `clock_out_time` are time-of-day strings which only
/// become instants once combined with `date`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatus {
    pub employee: Option<EmployeeRef>,
    pub date: Option<String>,
    pub clock_in_time: Option<String>,
    pub clock_out_time: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("attendance record has no date")]
    MissingDate,
    #[error("invalid attendance date: {0}")]
    InvalidDate(String),
    #[error("invalid clock-in time: {0}")]
    InvalidTime(String),
}

impl AttendanceStatus {
    /// True when the record describes a session that was opened and not yet closed
    pub fn has_open_session(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.clock_in_time) && !present(&self.clock_out_time)
    }

    pub fn employee_id(&self) -> Option<u64> {
        self.employee.as_ref().map(|e| e.emp_id)
    }

    /// Combines `date` and `clock_in_time` into a single local instant.
    pub fn clock_in_instant(&self) -> Result<Option<NaiveDateTime>, SnapshotError> {
        let Some(time) = self.clock_in_time.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };
        let date = self.date.as_deref().ok_or(SnapshotError::MissingDate)?;
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| SnapshotError::InvalidDate(date.to_string()))?;
        let time = parse_time_of_day(time).ok_or_else(|| SnapshotError::InvalidTime(time.to_string()))?;

        Ok(Some(date.and_time(time)))
    }
}

// backend may send "09:00:00", "09:00:00.123456" or "09:00"
fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Body of the clock-in call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInPayload {
    pub work_from: String,
    pub mode: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Body of the regularization call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularizationPayload {
    pub date: NaiveDate,
    pub reason: String,
}
