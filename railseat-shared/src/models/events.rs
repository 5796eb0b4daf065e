use uuid::Uuid;
use chrono::NaiveDate;

/// Emitted whenever a seat changes status on a given travel date.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SeatStatusChangedEvent {
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub seat_id: String,
    pub from_status: String,
    pub to_status: String,
    pub booking_id: Option<Uuid>,
    pub changed_at: i64,
}

/// Queued for the booking service once seats have been released.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationCancelledEvent {
    pub booking_id: Uuid,
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub seat_ids: Vec<String>,
    pub timestamp: i64,
}
