use super::{respond, shell};
use crate::dashboard::Dashboards;
use crate::models::RegularizationForm;
use actix_web::{HttpResponse, Responder, web};

/// Dates a correction may target: the 1st of this month up to today
#[utoipa::path(
    get,
    path = "/api/dashboard/{role}/regularization/window",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    responses(
        (status = 200, description = "Selectable date range", body = RegularizationWindow),
        (status = 404, description = "Unknown dashboard")
    ),
    tag = "Regularization"
)]
pub async fn window(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(HttpResponse::Ok().json(shell.controller.regularization_window()))
}

/// Submit an attendance correction request
#[utoipa::path(
    post,
    path = "/api/dashboard/{role}/regularization",
    params(("role" = String, Path, description = "Dashboard shell: manager or finance")),
    request_body = RegularizationForm,
    responses(
        (status = 200, description = "Request submitted", body = ActionReport),
        (status = 400, description = "Form invalid or date outside the window", body = ActionReport),
        (status = 502, description = "Backend rejected the request", body = ActionReport)
    ),
    tag = "Regularization"
)]
pub async fn submit(
    dashboards: web::Data<Dashboards>,
    role: web::Path<String>,
    form: web::Json<RegularizationForm>,
) -> actix_web::Result<impl Responder> {
    let shell = shell(&dashboards, &role)?;
    Ok(respond(shell.controller.submit_regularization(&form).await))
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
    async fn window_is_month_start_to_today() {
        let backend = Arc::new(FakeBackend::default());
        let app = test::init_service(
            App::new()
                .app_data(dashboards(backend, FakeGeolocation::at(1.0, 2.0)))
                .service(web::scope("/api").configure(routes::dashboard_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/manager/regularization/window")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["min"], "2024-03-01");
        assert_eq!(body["max"], "2024-03-15");
    }

    #[actix_web::test]
    async fn submit_validates_before_calling_the_backend() {
        let backend = Arc::new(FakeBackend::default());
        let app = test::init_service(
            App::new()
                .app_data(dashboards(backend.clone(), FakeGeolocation::at(1.0, 2.0)))
                .service(web::scope("/api").configure(routes::dashboard_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/dashboard/finance/regularization")
            .set_json(json!({"date": "2024-03-20", "reason": "Forgot to clock in"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let req = test::TestRequest::post()
            .uri("/api/dashboard/finance/regularization")
            .set_json(json!({"date": "2024-03-04", "reason": "Forgot, sorry!"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["outcome"], "form_invalid");
        assert_eq!(backend.regularization_calls(), 0);

        let req = test::TestRequest::post()
            .uri("/api/dashboard/finance/regularization")
            .set_json(json!({"date": "2024-03-04", "reason": "Forgot to clock in"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["outcome"], "success");
        assert_eq!(body["notification"]["summary"], "Regularization Submitted");
        assert_eq!(backend.regularization_calls(), 1);
    }
}
