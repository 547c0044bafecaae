use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockInForm {
    #[schema(example = "office")]
    #[serde(default)]
    pub work_from: String,
    #[schema(example = "full-day")]
    #[serde(default)]
    pub mode: String,
}

impl ClockInForm {
    /// Both fields are required
    pub fn is_valid(&self) -> bool {
        !self.work_from.trim().is_empty() && !self.mode.trim().is_empty()
    }
}

/// Regularization form exactly as typed; shaped and validated server side
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegularizationForm {
    #[schema(example = "2026-01-05")]
    #[serde(default)]
    pub date: String,
    #[schema(example = "Forgot to clock in")]
    #[serde(default)]
    pub reason: String,
}

/// Claims carried by the session token the backend issued at login
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_in_form_requires_both_fields() {
        let form = ClockInForm { work_from: "office".into(), mode: "".into() };
        assert!(!form.is_valid());

        let form = ClockInForm { work_from: "  ".into(), mode: "full-day".into() };
        assert!(!form.is_valid());

        let form = ClockInForm { work_from: "home".into(), mode: "half-day".into() };
        assert!(form.is_valid());
    }

    #[test]
    fn clock_in_form_reads_camel_case() {
        let form: ClockInForm = serde_json::from_str(r#"{"workFrom":"home","mode":"wfh"}"#).unwrap();
        assert_eq!(form.work_from, "home");
        assert_eq!(form.mode, "wfh");
    }
}
