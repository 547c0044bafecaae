use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod attendance;
mod auth;
mod backend;
mod config;
mod dashboard;
mod docs;
mod geolocation;
mod model;
mod models;
mod routes;

use attendance::SystemClock;
use auth::session::AuthSession;
use backend::{AttendanceBackend, HttpAttendanceBackend};
use config::Config;
use dashboard::Dashboards;
use geolocation::{ConfiguredGeolocation, GeolocationSource};

use crate::docs::ApiDoc;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance dashboard is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "dashboard.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Dashboard starting...");

    let session = AuthSession::from_token(&config.session_token)
        .context("SESSION_TOKEN is not a usable session token")?;
    if session.employee_id.is_none() {
        warn!(user = %session.username, "no employee profile linked, clock-in will be refused");
    }

    let backend: Arc<dyn AttendanceBackend> = Arc::new(
        HttpAttendanceBackend::new(&config.backend_url, session.clone(), config.request_timeout)
            .context("failed to build backend client")?,
    );
    let geolocation: Arc<dyn GeolocationSource> =
        Arc::new(ConfiguredGeolocation::from_config(&config));

    // one registry shared by every worker so each shell has a single session
    let dashboards = Data::new(Dashboards::new(
        &session,
        backend,
        geolocation,
        config.geolocation_timeout,
        Arc::new(SystemClock),
    ));

    // Clone values for the closure (avoid move issues)
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    info!(addr = %server_addr, backend = %config.backend_url, "serving dashboards");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(dashboards.clone())
            .service(index)
            // Dashboard routes with rate limiting
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
