use super::clock::Clock;
use super::ticker::ElapsedTimeTicker;
use crate::backend::{AttendanceBackend, BackendError};
use crate::geolocation::{self, GeolocationSource};
use crate::model::attendance::{AttendanceStatus, ClockInPayload, SnapshotError};
use crate::model::geolocation::GeolocationError;
use crate::model::session::{AttendanceSession, SessionStatus, SessionView};
use crate::models::ClockInForm;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("work location and mode are required")]
    FormInvalid,
    /// Client-side guard: this view already shows an open session
    #[error("already clocked in")]
    AlreadyClockedIn,
    #[error("not clocked in")]
    NotClockedIn,
    #[error("no employee profile linked to this session")]
    MissingEmployee,
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
    /// Backend refused a second clock-in for the same day
    #[error("cannot clock in again today")]
    ConflictAlreadyClockedIn,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Confirmed transition and the backend's message for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub at: NaiveDateTime,
    pub message: String,
}

/// Client-side view of today's attendance for one dashboard.
///
/// `Unknown` until the first `resume`, then `ClockedOut` or `ClockedIn`.
/// State only changes after the backend confirmed a transition; the backend
/// stays the authority, this is advisory.
pub struct AttendanceSessionMachine {
    session: AttendanceSession,
    resumed: bool,
    ticker: ElapsedTimeTicker,
    clock: Arc<dyn Clock>,
    backend: Arc<dyn AttendanceBackend>,
    geolocation: Arc<dyn GeolocationSource>,
    geolocation_timeout: Duration,
}

impl AttendanceSessionMachine {
    pub fn new(
        employee_id: Option<u64>,
        clock: Arc<dyn Clock>,
        backend: Arc<dyn AttendanceBackend>,
        geolocation: Arc<dyn GeolocationSource>,
        geolocation_timeout: Duration,
    ) -> Self {
        Self {
            session: AttendanceSession::for_employee(employee_id),
            resumed: false,
            ticker: ElapsedTimeTicker::new(),
            clock,
            backend,
            geolocation,
            geolocation_timeout,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.resumed {
            self.session.status()
        } else {
            SessionStatus::Unknown
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &AttendanceSession {
        &self.session
    }

    #[cfg(test)]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn elapsed(&self) -> String {
        self.ticker.current()
    }

    pub fn subscribe_elapsed(&self) -> watch::Receiver<String> {
        self.ticker.subscribe()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            status: self.status(),
            employee_id: self.session.employee_id,
            clock_in: self.session.clock_in.filter(|_| self.session.is_open()),
            elapsed: self.elapsed(),
        }
    }

    /// Rebuilds state from the backend's current-day record.
    ///
    /// Resuming the same open session again keeps the running ticker.
    pub fn resume(&mut self, snapshot: &AttendanceStatus) -> Result<SessionStatus, SnapshotError> {
        if let Some(employee_id) = snapshot.employee_id() {
            self.session.employee_id = Some(employee_id);
        }

        if !snapshot.has_open_session() {
            self.close_locally();
            debug!(employee_id = ?self.session.employee_id, "resumed: no open session");
            return Ok(self.status());
        }

        let started_at = match snapshot.clock_in_instant() {
            Ok(Some(started_at)) => started_at,
            Ok(None) => {
                self.close_locally();
                return Ok(self.status());
            }
            Err(e) => {
                self.close_locally();
                return Err(e);
            }
        };

        let unchanged = self.resumed
            && self.session.is_open()
            && self.session.clock_in == Some(started_at)
            && self.ticker.is_running();
        if !unchanged {
            self.open_at(started_at);
        }
        info!(employee_id = ?self.session.employee_id, %started_at, "resumed open session");

        Ok(self.status())
    }

    /// Status could not be fetched; treat the view as clocked out.
    pub fn assume_clocked_out(&mut self) {
        if !self.resumed {
            self.close_locally();
        }
    }

    /// Validates the form, takes one position reading and asks the backend
    /// to open today's session. Nothing is sent when any precondition fails.
    pub async fn request_clock_in(&mut self, form: &ClockInForm) -> Result<Receipt, AttendanceError> {
        if !form.is_valid() {
            return Err(AttendanceError::FormInvalid);
        }
        if self.status() == SessionStatus::ClockedIn {
            return Err(AttendanceError::AlreadyClockedIn);
        }
        if self.session.employee_id.is_none() {
            return Err(AttendanceError::MissingEmployee);
        }

        let position = geolocation::acquire(self.geolocation.as_ref(), self.geolocation_timeout)
            .await
            .inspect_err(|e| warn!(error = %e, "clock-in aborted: no position"))?;

        let payload = ClockInPayload {
            work_from: form.work_from.trim().to_string(),
            mode: form.mode.trim().to_string(),
            latitude: position.latitude,
            longitude: position.longitude,
        };

        match self.backend.clock_in(&payload).await {
            Ok(message) => {
                let at = self.clock.now();
                self.open_at(at);
                info!(employee_id = ?self.session.employee_id, %at, "clocked in");
                Ok(Receipt { at, message })
            }
            Err(e) if e.is_already_clocked_in() => {
                warn!(employee_id = ?self.session.employee_id, "backend reports an existing session today");
                Err(AttendanceError::ConflictAlreadyClockedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Asks the backend to close the open session. On failure nothing
    /// changes and the ticker keeps running.
    pub async fn request_clock_out(&mut self) -> Result<Receipt, AttendanceError> {
        if self.status() != SessionStatus::ClockedIn {
            return Err(AttendanceError::NotClockedIn);
        }

        let message = self.backend.clock_out().await?;
        let at = self.clock.now();
        self.session.clock_out = Some(at);
        self.ticker.stop();
        info!(employee_id = ?self.session.employee_id, %at, "clocked out");

        Ok(Receipt { at, message })
    }

    /// View teardown: cancels the ticker and forgets the resumed state.
    pub fn teardown(&mut self) {
        self.ticker.stop();
        self.session.clock_in = None;
        self.session.clock_out = None;
        self.resumed = false;
    }

    fn open_at(&mut self, started_at: NaiveDateTime) {
        self.session.clock_in = Some(started_at);
        self.session.clock_out = None;
        self.resumed = true;
        self.ticker.start(started_at, Arc::clone(&self.clock));
    }

    fn close_locally(&mut self) {
        self.ticker.stop();
        self.session.clock_in = None;
        self.session.clock_out = None;
        self.resumed = true;
    }
}
