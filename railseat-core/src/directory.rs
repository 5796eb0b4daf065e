use async_trait::async_trait;
use uuid::Uuid;

use crate::SeatError;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Booking service unreachable: {0}")]
    Unreachable(String),
    #[error("Booking service returned status {0}")]
    UnexpectedStatus(u16),
    #[error("Booking service circuit is open")]
    CircuitOpen,
}

impl From<DirectoryError> for SeatError {
    fn from(err: DirectoryError) -> Self {
        SeatError::ServiceUnavailable(err.to_string())
    }
}

/// The booking service that issues booking ids and owns their lifecycle.
#[async_trait]
pub trait BookingDirectory: Send + Sync {
    /// Check that the booking id was issued and is still known
    async fn exists(&self, booking_id: Uuid) -> Result<bool, DirectoryError>;

    /// Tell the booking service its seats were released
    async fn notify_cancelled(&self, booking_id: Uuid) -> Result<(), DirectoryError>;
}
