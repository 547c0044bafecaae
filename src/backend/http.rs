use super::{AttendanceBackend, BackendError, extract_message};
use crate::auth::session::AuthSession;
use crate::model::attendance::{AttendanceStatus, ClockInPayload, RegularizationPayload};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::{debug, instrument, warn};

const STATUS_PATH: &str = "attendance/status";
const CLOCK_IN_PATH: &str = "attendance/clock-in";
const CLOCK_OUT_PATH: &str = "attendance/clock-out";
const REGULARIZATION_PATH: &str = "attendance/regularization";

/// reqwest-backed client for the HRMS attendance API.
///
/// Every call is fire-once; retries, if any, are the caller's business.
pub struct HttpAttendanceBackend {
    client: Client,
    base_url: String,
    session: AuthSession,
}

impl HttpAttendanceBackend {
    pub fn new(base_url: &str, session: AuthSession, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Sends the request with the session credential and returns the raw body
    async fn send(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let response = request
            .header(AUTHORIZATION, self.session.bearer())
            .header(ACCEPT, "application/json, text/plain")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            debug!(status = status.as_u16(), "backend call succeeded");
            Ok(body)
        } else {
            warn!(status = status.as_u16(), body = %body, "backend call rejected");
            Err(BackendError::Rejected {
                status: status.as_u16(),
                message: extract_message(&body),
            })
        }
    }

    async fn send_for_message(&self, request: RequestBuilder) -> Result<String, BackendError> {
        let body = self.send(request).await?;
        Ok(extract_message(&body).unwrap_or_default())
    }
}

#[async_trait]
impl AttendanceBackend for HttpAttendanceBackend {
    #[instrument(skip(self))]
    async fn current_status(&self) -> Result<AttendanceStatus, BackendError> {
        let body = self.send(self.client.get(self.endpoint(STATUS_PATH))).await?;
        parse_status(&body)
    }

    #[instrument(skip(self, payload), fields(work_from = %payload.work_from, mode = %payload.mode))]
    async fn clock_in(&self, payload: &ClockInPayload) -> Result<String, BackendError> {
        self.send_for_message(self.client.post(self.endpoint(CLOCK_IN_PATH)).json(payload))
            .await
    }

    #[instrument(skip(self))]
    async fn clock_out(&self) -> Result<String, BackendError> {
        self.send_for_message(self.client.post(self.endpoint(CLOCK_OUT_PATH)))
            .await
    }

    #[instrument(skip(self, payload), fields(date = %payload.date))]
    async fn request_regularization(
        &self,
        payload: &RegularizationPayload,
    ) -> Result<String, BackendError> {
        self.send_for_message(
            self.client
                .post(self.endpoint(REGULARIZATION_PATH))
                .json(payload),
        )
        .await
    }
}

/// No record for today comes back as an empty body or `null`
fn parse_status(body: &str) -> Result<AttendanceStatus, BackendError> {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Ok(AttendanceStatus::default());
    }
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}
