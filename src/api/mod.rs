pub mod attendance;
pub mod notifications;
pub mod regularization;

use crate::dashboard::{ActionReport, DashboardShell, Dashboards, Outcome};
use crate::model::role::DashboardRole;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;

/// Resolves the `{role}` path segment to its shell
pub(crate) fn shell<'a>(dashboards: &'a Dashboards, role: &str) -> actix_web::Result<&'a DashboardShell> {
    DashboardRole::from_slug(role)
        .and_then(|role| dashboards.shell(role))
        .ok_or_else(|| actix_web::error::ErrorNotFound("Unknown dashboard"))
}

pub(crate) fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Success => StatusCode::OK,
        Outcome::FormInvalid | Outcome::DateOutOfWindow => StatusCode::BAD_REQUEST,
        Outcome::MissingEmployee => StatusCode::FORBIDDEN,
        Outcome::StateConflict | Outcome::AlreadyClockedInToday => StatusCode::CONFLICT,
        Outcome::LocationError => StatusCode::FAILED_DEPENDENCY,
        Outcome::BackendFailure => StatusCode::BAD_GATEWAY,
    }
}

pub(crate) fn respond(report: ActionReport) -> HttpResponse {
    HttpResponse::build(status_for(report.outcome)).json(report)
}
