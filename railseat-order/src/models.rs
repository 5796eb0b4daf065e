use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use railseat_core::{CoachClass, Seat, SeatId, SeatPreference};

/// Seats committed to one booking on one train and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub booking_id: Uuid,
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub class: CoachClass,
    pub seats: Vec<SeatId>,
    pub created_at: DateTime<Utc>,
}

/// Everything the allocation engine needs to place a party
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveRequest {
    pub booking_id: Uuid,
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub class: CoachClass,
    pub passenger_count: usize,
    /// Explicit seats; when present the engine performs no scoring
    #[serde(default)]
    pub preferred_seats: Option<Vec<SeatId>>,
    #[serde(default)]
    pub preferences: Vec<SeatPreference>,
}

/// A reservation resolved against the registry, with its fare
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationDetails {
    pub booking_id: Uuid,
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub class: CoachClass,
    pub seats: Vec<Seat>,
    pub fare: f64,
    pub created_at: DateTime<Utc>,
}

/// Seat-side view of a booking
#[derive(Debug, Clone, PartialEq)]
pub enum BookingSeatStatus {
    /// Seats are committed to the booking
    Confirmed(ReservationDetails),
    /// The booking service knows the booking but it holds no seats
    Unconfirmed,
}
