pub mod models;
pub mod ledger;
pub mod scoring;
pub mod availability;
pub mod outbox;
pub mod engine;

pub use models::{BookingSeatStatus, Reservation, ReservationDetails, ReserveRequest};
pub use ledger::ReservationLedger;
pub use scoring::{select_seats, GroupingPolicy, Selection};
pub use availability::{CoachAvailability, SeatCounts, TrainAvailability};
pub use outbox::CancellationOutbox;
pub use engine::AllocationEngine;
