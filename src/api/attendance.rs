use super::{respond, shell};
use crate::dashboard::Dashboards;
use crate::models::ClockInForm;
use actix_web::{HttpResponse, Responder, web};

/// View activation: fetch today's record and resume the session
#[utoipa::path(
    post,
    path = "/api/dashboard/{role}/activate",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    responses(
        (status = 200, description = "Dashboard activated", body = DashboardView),
        (status = 404, description = "Unknown dashboard")
    ),
    tag = "Attendance"
)]
pub async fn activate(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(HttpResponse::Ok().json(shell.controller.activate().await))
}

/// View teardown: stop the elapsed-time ticker
#[utoipa::path(
    delete,
    path = "/api/dashboard/{role}/activate",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    responses(
        (status = 204, description = "Dashboard deactivated"),
        (status = 404, description = "Unknown dashboard")
    ),
    tag = "Attendance"
)]
pub async fn deactivate(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    shell.controller.deactivate().await;
    Ok(HttpResponse::NoContent().finish())
}

/// Current session: status, clock-in instant and elapsed time
#[utoipa::path(
    get,
    path = "/api/dashboard/{role}/attendance",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    responses(
        (status = 200, description = "Current session", body = DashboardView),
        (status = 404, description = "Unknown dashboard")
    ),
    tag = "Attendance"
)]
pub async fn session(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(HttpResponse::Ok().json(shell.controller.view().await))
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/dashboard/{role}/attendance/clock-in",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    request_body = ClockInForm,
    responses(
        (status = 200, description = "Clocked in", body = ActionReport),
        (status = 400, description = "Work location or mode missing", body = ActionReport),
        (status = 403, description = "No employee profile", body = ActionReport),
        (status = 409, description = "Already clocked in today", body = ActionReport),
        (status = 424, description = "Device position unavailable", body = ActionReport),
        (status = 502, description = "Backend rejected the clock-in", body = ActionReport)
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
    form: web::Json<ClockInForm>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(respond(shell.controller.clock_in(&form).await))
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/dashboard/{role}/attendance/clock-out",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    responses(
        (status = 200, description = "Clocked out", body = ActionReport),
        (status = 409, description = "Not clocked in", body = ActionReport),
        (status = 502, description = "Backend rejected the clock-out", body = ActionReport)
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(respond(shell.controller.clock_out().await))
}
