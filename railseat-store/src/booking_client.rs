use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;
use railseat_core::{BookingDirectory, DirectoryError};

/// Booking service reached over HTTP.
///
/// `GET {base}/train-bookings/{id}` answers existence, and
/// `PUT {base}/train-bookings/{id}/cancel` tells it seats were released.
#[derive(Clone)]
pub struct HttpBookingDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn booking_url(&self, booking_id: Uuid) -> String {
        format!("{}/train-bookings/{}", self.base_url, booking_id)
    }
}

#[async_trait]
impl BookingDirectory for HttpBookingDirectory {
    async fn exists(&self, booking_id: Uuid) -> Result<bool, DirectoryError> {
        let response = self
            .client
            .get(self.booking_url(booking_id))
            .send()
            .await
            .map_err(|e| DirectoryError::Unreachable(e.to_string()))?;

        debug!(%booking_id, status = %response.status(), "Booking lookup");
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(DirectoryError::UnexpectedStatus(status.as_u16())),
        }
    }

    async fn notify_cancelled(&self, booking_id: Uuid) -> Result<(), DirectoryError> {
        let response = self
            .client
            .put(format!("{}/cancel", self.booking_url(booking_id)))
            .send()
            .await
            .map_err(|e| DirectoryError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(DirectoryError::UnexpectedStatus(response.status().as_u16()))
        }
    }
}

/// In-process stand-in used when no booking service is configured.
/// Every booking id is treated as issued.
#[derive(Debug, Default, Clone)]
pub struct LocalBookingDirectory;

#[async_trait]
impl BookingDirectory for LocalBookingDirectory {
    async fn exists(&self, _booking_id: Uuid) -> Result<bool, DirectoryError> {
        Ok(true)
    }

    async fn notify_cancelled(&self, booking_id: Uuid) -> Result<(), DirectoryError> {
        info!(%booking_id, "No booking service configured; cancellation recorded locally");
        Ok(())
    }
}
