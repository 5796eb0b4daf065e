use crate::models::Reservation;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;
use railseat_core::{CoachClass, CoreResult, SeatError, SeatId};

/// Live reservations keyed by booking id
pub struct ReservationLedger {
    reservations: RwLock<HashMap<Uuid, Reservation>>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self {
            reservations: RwLock::new(HashMap::new()),
        }
    }

    /// Record the seats committed to a booking.
    ///
    /// A booking holds at most one live reservation across all trains.
    pub fn commit(
        &self,
        booking_id: Uuid,
        train_id: &str,
        travel_date: NaiveDate,
        class: CoachClass,
        seats: Vec<SeatId>,
    ) -> CoreResult<Reservation> {
        let mut reservations = self.reservations.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = reservations.get(&booking_id) {
            return Err(SeatError::Conflict(format!(
                "booking {} already holds seats on train {} for {}",
                booking_id, existing.train_id, existing.travel_date
            )));
        }

        let reservation = Reservation {
            booking_id,
            train_id: train_id.to_string(),
            travel_date,
            class,
            seats,
            created_at: Utc::now(),
        };
        reservations.insert(booking_id, reservation.clone());
        Ok(reservation)
    }

    pub fn get(&self, booking_id: &Uuid) -> CoreResult<Reservation> {
        self.reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(booking_id)
            .cloned()
            .ok_or_else(|| SeatError::NotFound(format!("reservation for booking {}", booking_id)))
    }

    pub fn contains(&self, booking_id: &Uuid) -> bool {
        self.reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(booking_id)
    }

    /// Remove the booking's entry and hand back what it held so the caller
    /// can free the seats in the registry
    pub fn release(&self, booking_id: &Uuid) -> CoreResult<Reservation> {
        self.reservations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(booking_id)
            .ok_or_else(|| SeatError::NotFound(format!("reservation for booking {}", booking_id)))
    }

    /// Live reservations for one train on one date
    pub fn for_train_date(&self, train_id: &str, travel_date: NaiveDate) -> Vec<Reservation> {
        let mut found: Vec<Reservation> = self
            .reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|r| r.train_id == train_id && r.travel_date == travel_date)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        found
    }

    pub fn len(&self) -> usize {
        self.reservations.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReservationLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, day).unwrap()
    }

    #[test]
    fn test_reservation_lifecycle() {
        let ledger = ReservationLedger::new();
        let booking = Uuid::new_v4();
        let seats = vec![SeatId::new(2, "1A"), SeatId::new(2, "1B")];

        let reservation = ledger
            .commit(booking, "TRN001", date(5), CoachClass::Business, seats.clone())
            .unwrap();
        assert_eq!(reservation.seats, seats);
        assert_eq!(ledger.get(&booking).unwrap(), reservation);
        assert!(ledger.for_train_date("TRN001", date(6)).is_empty());
        assert_eq!(ledger.for_train_date("TRN001", date(5)), vec![reservation.clone()]);
        assert!(ledger.for_train_date("TRN002", date(5)).is_empty());

        let released = ledger.release(&booking).unwrap();
        assert_eq!(released.seats, seats);
        assert!(ledger.is_empty());
        assert!(matches!(ledger.get(&booking), Err(SeatError::NotFound(_))));
        assert!(matches!(ledger.release(&booking), Err(SeatError::NotFound(_))));
    }

    #[test]
    fn test_booking_holds_one_reservation() {
        let ledger = ReservationLedger::new();
        let booking = Uuid::new_v4();
        ledger
            .commit(booking, "TRN001", date(5), CoachClass::Economy, vec![SeatId::new(4, "1A")])
            .unwrap();

        let err = ledger
            .commit(booking, "TRN003", date(9), CoachClass::Economy, vec![SeatId::new(4, "1B")])
            .unwrap_err();
        assert!(matches!(err, SeatError::Conflict(_)));
        assert_eq!(ledger.len(), 1);
    }
}
