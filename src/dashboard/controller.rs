use super::notify::NotificationSink;
use crate::attendance::regularization::{self, RegularizationError, RegularizationWindow};
use crate::attendance::{AttendanceError, AttendanceSessionMachine, Clock};
use crate::backend::AttendanceBackend;
use crate::geolocation::GeolocationSource;
use crate::model::geolocation::GeolocationError;
use crate::model::notification::Notification;
use crate::model::role::DashboardRole;
use crate::model::session::{SessionStatus, SessionView};
use crate::models::{ClockInForm, RegularizationForm};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// How a user action ended, independent of wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    FormInvalid,
    /// Local state forbids the action (already in / not in)
    StateConflict,
    MissingEmployee,
    LocationError,
    /// Backend refused a second clock-in today
    AlreadyClockedInToday,
    DateOutOfWindow,
    BackendFailure,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActionReport {
    pub outcome: Outcome,
    pub notification: Notification,
    pub session: SessionView,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    pub role: DashboardRole,
    pub username: String,
    pub session: SessionView,
}

/// Shared behaviour behind every role dashboard.
///
/// Each instance owns its own session machine, so two shells never share
/// attendance state. Actions are serialized on the machine lock: a response
/// is always applied to the machine that issued the request. Reads never take
/// that lock; they see the last applied transition and the live elapsed time.
pub struct DashboardController {
    role: DashboardRole,
    username: String,
    machine: Mutex<AttendanceSessionMachine>,
    published: watch::Sender<SessionView>,
    elapsed: watch::Receiver<String>,
    backend: Arc<dyn AttendanceBackend>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
}

impl DashboardController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        role: DashboardRole,
        username: String,
        employee_id: Option<u64>,
        backend: Arc<dyn AttendanceBackend>,
        geolocation: Arc<dyn GeolocationSource>,
        geolocation_timeout: Duration,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let machine = AttendanceSessionMachine::new(
            employee_id,
            Arc::clone(&clock),
            Arc::clone(&backend),
            geolocation,
            geolocation_timeout,
        );
        let (published, _) = watch::channel(machine.view());
        let elapsed = machine.subscribe_elapsed();
        Self {
            role,
            username,
            machine: Mutex::new(machine),
            published,
            elapsed,
            backend,
            clock,
            sink,
        }
    }

    /// Answers immediately, even while a clock-in or clock-out is in flight.
    pub async fn view(&self) -> DashboardView {
        DashboardView {
            role: self.role,
            username: self.username.clone(),
            session: self.current_session(),
        }
    }

    /// View activation: fetches today's record and resumes from it.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn activate(&self) -> DashboardView {
        let mut machine = self.machine.lock().await;
        self.resume(&mut machine).await;
        DashboardView {
            role: self.role,
            username: self.username.clone(),
            session: self.publish(&machine),
        }
    }

    /// View teardown: the ticker is cancelled and the next action resumes again.
    pub async fn deactivate(&self) {
        let mut machine = self.machine.lock().await;
        machine.teardown();
        self.publish(&machine);
        info!(role = %self.role, "dashboard view torn down");
    }

    #[instrument(skip(self, form), fields(role = %self.role))]
    pub async fn clock_in(&self, form: &ClockInForm) -> ActionReport {
        let mut machine = self.machine.lock().await;
        self.ensure_resumed(&mut machine).await;

        let (outcome, notification) = match machine.request_clock_in(form).await {
            Ok(receipt) => (
                Outcome::Success,
                Notification::success(
                    "Clock-in Successful",
                    format!(
                        "{} at {}. Have a great day!",
                        or_default(&receipt.message, "Clocked in"),
                        hh_mm(receipt.at)
                    ),
                ),
            ),
            Err(e) => attendance_failure(&e, "Clock-in failed"),
        };

        let session = self.publish(&machine);
        self.report(outcome, notification, session)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn clock_out(&self) -> ActionReport {
        let mut machine = self.machine.lock().await;
        self.ensure_resumed(&mut machine).await;

        let (outcome, notification) = match machine.request_clock_out().await {
            Ok(receipt) => (
                Outcome::Success,
                Notification::success(
                    "Clock-out Successful",
                    format!(
                        "{} at {}. Have a nice day!",
                        or_default(&receipt.message, "You clocked out"),
                        hh_mm(receipt.at)
                    ),
                ),
            ),
            Err(e) => attendance_failure(&e, "Clock-out failed"),
        };

        let session = self.publish(&machine);
        self.report(outcome, notification, session)
    }

    /// Dates a correction may target today
    pub fn regularization_window(&self) -> RegularizationWindow {
        RegularizationWindow::for_today(self.clock.today())
    }

    #[instrument(skip(self, form), fields(role = %self.role))]
    pub async fn submit_regularization(&self, form: &RegularizationForm) -> ActionReport {
        let now = self.clock.now();
        let result = regularization::submit(self.backend.as_ref(), form, now.date()).await;

        let (outcome, notification) = match result {
            Ok((payload, message)) => (
                Outcome::Success,
                Notification::success(
                    "Regularization Submitted",
                    format!(
                        "{} on {} at {}.",
                        or_default(&message, "Request submitted"),
                        payload.date.format("%Y-%m-%d"),
                        hh_mm(now)
                    ),
                ),
            ),
            Err(e) => regularization_failure(&e),
        };

        self.report(outcome, notification, self.current_session())
    }

    async fn ensure_resumed(&self, machine: &mut AttendanceSessionMachine) {
        if machine.status() == SessionStatus::Unknown {
            self.resume(machine).await;
        }
    }

    async fn resume(&self, machine: &mut AttendanceSessionMachine) {
        match self.backend.current_status().await {
            Ok(snapshot) => {
                if let Err(e) = machine.resume(&snapshot) {
                    warn!(role = %self.role, error = %e, "unreadable attendance record, assuming clocked out");
                }
            }
            Err(e) => {
                // not escalated: the dashboard stays usable as clocked out
                error!(role = %self.role, error = %e, "Failed to fetch attendance status");
                machine.assume_clocked_out();
            }
        }
    }

    /// Makes the machine's state visible to readers
    fn publish(&self, machine: &AttendanceSessionMachine) -> SessionView {
        let session = machine.view();
        self.published.send_replace(session.clone());
        session
    }

    fn current_session(&self) -> SessionView {
        let mut session = self.published.borrow().clone();
        session.elapsed = self.elapsed.borrow().clone();
        session
    }

    fn report(&self, outcome: Outcome, notification: Notification, session: SessionView) -> ActionReport {
        self.sink.notify(notification.clone());
        ActionReport {
            outcome,
            notification,
            session,
        }
    }
}

fn hh_mm(at: NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

fn or_default<'a>(message: &'a str, default: &'a str) -> &'a str {
    if message.trim().is_empty() { default } else { message }
}

fn attendance_failure(error: &AttendanceError, fallback: &str) -> (Outcome, Notification) {
    match error {
        AttendanceError::FormInvalid => (
            Outcome::FormInvalid,
            Notification::warn("Form Invalid", "Fill all required fields."),
        ),
        AttendanceError::AlreadyClockedIn => (
            Outcome::StateConflict,
            Notification::warn("Already Clocked In", "You are already clocked in."),
        ),
        AttendanceError::NotClockedIn => (
            Outcome::StateConflict,
            Notification::warn("Not Clocked In", "You are not clocked in."),
        ),
        AttendanceError::MissingEmployee => (
            Outcome::MissingEmployee,
            Notification::error("Clock-in Failed", "No employee profile is linked to this account."),
        ),
        AttendanceError::Geolocation(GeolocationError::Unsupported) => (
            Outcome::LocationError,
            Notification::error(
                "Geolocation Not Supported",
                GeolocationError::Unsupported.user_message(),
            ),
        ),
        AttendanceError::Geolocation(e) => (
            Outcome::LocationError,
            Notification::error("Location Error", e.user_message()),
        ),
        AttendanceError::ConflictAlreadyClockedIn => (
            Outcome::AlreadyClockedInToday,
            Notification::error("Clock-in Failed", "You cannot clock in again today."),
        ),
        AttendanceError::Backend(e) => (
            Outcome::BackendFailure,
            Notification::error("Error", e.user_message(fallback)),
        ),
    }
}

fn regularization_failure(error: &RegularizationError) -> (Outcome, Notification) {
    match error {
        RegularizationError::FormInvalid => (
            Outcome::FormInvalid,
            Notification::warn("Form Invalid", "Fill all required fields."),
        ),
        RegularizationError::ReasonPatternInvalid => (
            Outcome::FormInvalid,
            Notification::warn(
                "Form Invalid",
                "Reason may contain only letters, numbers and spaces.",
            ),
        ),
        RegularizationError::DateOutOfWindow { .. } => (
            Outcome::DateOutOfWindow,
            Notification::error("Invalid Date", "Please select a date from the 1st up to today."),
        ),
        RegularizationError::Backend(e) => (
            Outcome::BackendFailure,
            Notification::error("Request Failed", e.user_message("Request failed")),
        ),
    }
}
