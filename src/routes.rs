use crate::{
    api::{attendance, notifications, regularization},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

// Helper to build the dashboard limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let dashboard_limiter = build_limiter(config.rate_protected_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(dashboard_limiter) // rate limiting
            .configure(dashboard_routes),
    );
}

/// `/dashboard/{role}/...`, one set per role shell
pub fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard/{role}")
            // /dashboard/{role}/activate
            .service(
                web::resource("/activate")
                    .route(web::post().to(attendance::activate))
                    .route(web::delete().to(attendance::deactivate)),
            )
            // /dashboard/{role}/attendance
            .service(web::resource("/attendance").route(web::get().to(attendance::session)))
            .service(
                web::resource("/attendance/clock-in").route(web::post().to(attendance::clock_in)),
            )
            .service(
                web::resource("/attendance/clock-out").route(web::post().to(attendance::clock_out)),
            )
            // /dashboard/{role}/regularization
            .service(
                web::resource("/regularization/window")
                    .route(web::get().to(regularization::window)),
            )
            .service(
                web::resource("/regularization").route(web::post().to(regularization::submit)),
            )
            // /dashboard/{role}/notifications
            .service(web::resource("/notifications").route(web::get().to(notifications::drain))),
    );
}
