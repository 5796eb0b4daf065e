pub mod seat;
pub mod directory;

pub use seat::{CoachClass, Seat, SeatFeature, SeatId, SeatPreference, SeatStatus, SeatType};
pub use directory::{BookingDirectory, DirectoryError};

/// Error taxonomy shared by every seat-side component
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeatError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Seat unavailable: {0}")]
    Unavailable(String),
    #[error("Insufficient seats in {class}: requested {requested}, available {available}")]
    Insufficient {
        class: CoachClass,
        requested: usize,
        available: usize,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SeatError {
    /// Stable machine-readable code used in API responses and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            SeatError::NotFound(_) => "NOT_FOUND",
            SeatError::InvalidRequest(_) => "INVALID_REQUEST",
            SeatError::Unavailable(_) => "UNAVAILABLE",
            SeatError::Insufficient { .. } => "INSUFFICIENT",
            SeatError::Conflict(_) => "CONFLICT",
            SeatError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            SeatError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

pub type CoreResult<T> = Result<T, SeatError>;
