use super::shell;
use crate::dashboard::Dashboards;
use actix_web::{HttpResponse, Responder, web};

/// Drain the shell's pending notifications, oldest first
#[utoipa::path(
    get,
    path = "/api/dashboard/{role}/notifications",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    responses(
        (status = 200, description = "Pending notifications", body = [Notification]),
        (status = 404, description = "Unknown dashboard")
    ),
    tag = "Notifications"
)]
pub async fn drain(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(HttpResponse::Ok().json(shell.notifications.drain()))
}

#[cfg(test)]
mod tests {
    use crate::api::attendance::tests::dashboards;
    use crate::backend::tests::FakeBackend;
    use crate::geolocation::tests::FakeGeolocation;
    use crate::routes;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[actix_web::test]
    async fn queue_is_per_shell_and_drained_once() {
        let backend = Arc::new(FakeBackend::default());
        let app = test::init_service(
            App::new()
                .app_data(dashboards(backend, FakeGeolocation::at(1.0, 2.0)))
                .service(web::scope("/api").configure(routes::dashboard_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/dashboard/finance/attendance/clock-in")
            .set_json(json!({"workFrom": "", "mode": ""}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/manager/notifications")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(0));

        let req = test::TestRequest::get()
            .uri("/api/dashboard/finance/notifications")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["summary"], "Form Invalid");
        assert_eq!(body[0]["severity"], "warn");

        let req = test::TestRequest::get()
            .uri("/api/dashboard/finance/notifications")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(0));
    }
}
