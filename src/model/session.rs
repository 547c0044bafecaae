use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    /// Backend status not yet resolved for this view
    Unknown,
    ClockedOut,
    ClockedIn,
}

/// One employee's work interval for today
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceSession {
    pub employee_id: Option<u64>,
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
}

impl AttendanceSession {
    pub fn for_employee(employee_id: Option<u64>) -> Self {
        Self {
            employee_id,
            ..Self::default()
        }
    }

    /// Derived from the instants, never stored on its own.
    pub fn is_open(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_none()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_open() {
            SessionStatus::ClockedIn
        } else {
            SessionStatus::ClockedOut
        }
    }
}

/// What a dashboard shows about today's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "status": "clocked_in",
    "employee_id": 1001,
    "clock_in": "2026-01-05T09:00:00",
    "elapsed": "01:02:05"
}))]
pub struct SessionView {
    pub status: SessionStatus,
    pub employee_id: Option<u64>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_in: Option<NaiveDateTime>,
    pub elapsed: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn status_is_derived_from_instants() {
        let mut s = AttendanceSession::for_employee(Some(1));
        assert_eq!(s.status(), SessionStatus::ClockedOut);

        s.clock_in = Some(at(9));
        assert_eq!(s.status(), SessionStatus::ClockedIn);

        s.clock_out = Some(at(17));
        assert_eq!(s.status(), SessionStatus::ClockedOut);
    }

    #[test]
    fn status_renders_snake_case() {
        assert_eq!(SessionStatus::ClockedIn.to_string(), "clocked_in");
        assert_eq!("clocked_out".parse::<SessionStatus>().unwrap(), SessionStatus::ClockedOut);
    }
}
