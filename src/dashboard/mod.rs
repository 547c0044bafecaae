//! Role dashboard shells. Both shells compose the same controller; only the
//! role differs.

pub mod controller;
pub mod notify;

use crate::attendance::Clock;
use crate::auth::session::AuthSession;
use crate::backend::AttendanceBackend;
use crate::geolocation::GeolocationSource;
use crate::model::role::DashboardRole;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;

pub use controller::{ActionReport, DashboardController, DashboardView, Outcome};
pub use notify::NotificationQueue;

pub struct DashboardShell {
    pub controller: DashboardController,
    pub notifications: Arc<NotificationQueue>,
}

/// One independent shell per role
pub struct Dashboards {
    shells: HashMap<DashboardRole, DashboardShell>,
}

impl Dashboards {
    pub fn new(
        session: &AuthSession,
        backend: Arc<dyn AttendanceBackend>,
        geolocation: Arc<dyn GeolocationSource>,
        geolocation_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let shells = DashboardRole::iter()
            .map(|role| {
                let notifications = Arc::new(NotificationQueue::new(role));
                let controller = DashboardController::new(
                    role,
                    session.username.clone(),
                    session.employee_id,
                    Arc::clone(&backend),
                    Arc::clone(&geolocation),
                    geolocation_timeout,
                    Arc::clone(&clock),
                    notifications.clone(),
                );
                (role, DashboardShell { controller, notifications })
            })
            .collect();

        Self { shells }
    }

    pub fn shell(&self, role: DashboardRole) -> Option<&DashboardShell> {
        self.shells.get(&role)
    }
}
