use crate::attendance::RegularizationWindow;
use crate::dashboard::{ActionReport, DashboardView, Outcome};
use crate::model::notification::{Notification, Severity};
use crate::model::role::DashboardRole;
use crate::model::session::{SessionStatus, SessionView};
use crate::models::{ClockInForm, RegularizationForm};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Dashboard API",
        version = "1.0.0",
        description = r#"
## Attendance Dashboard

Local API behind the **Manager** and **Finance** dashboards of the HRM system.
Each role shell keeps its own attendance session; the backend stays the source of truth.

### 🔹 Key Features
- **Attendance**
  - Resume today's session on activation
  - Clock in with work location, mode and device position
  - Clock out and stop the live elapsed-time display
- **Regularization**
  - Request corrections for dates from the 1st of the month up to today
- **Notifications**
  - Success, warning and error messages per shell

### 🔐 Security
Calls to the backend carry the session token configured at startup as a **Bearer** credential.

---
Built with **Rust**, **Actix Web**, **Reqwest**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::activate,
        crate::api::attendance::deactivate,
        crate::api::attendance::session,
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,

        crate::api::regularization::window,
        crate::api::regularization::submit,

        crate::api::notifications::drain
    ),
    components(
        schemas(
            DashboardRole,
            DashboardView,
            SessionStatus,
            SessionView,
            ClockInForm,
            RegularizationForm,
            RegularizationWindow,
            ActionReport,
            Outcome,
            Notification,
            Severity
        )
    ),
    tags(
        (name = "Attendance", description = "Clock-in, clock-out and session APIs"),
        (name = "Regularization", description = "Attendance correction APIs"),
        (name = "Notifications", description = "User-facing outcome messages"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_dashboard_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for path in [
            "/api/dashboard/{role}/activate",
            "/api/dashboard/{role}/attendance",
            "/api/dashboard/{role}/attendance/clock-in",
            "/api/dashboard/{role}/attendance/clock-out",
            "/api/dashboard/{role}/regularization/window",
            "/api/dashboard/{role}/regularization",
            "/api/dashboard/{role}/notifications",
        ] {
            assert!(paths.iter().any(|p| p == path), "missing {path}");
        }
    }
}
