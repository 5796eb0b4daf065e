use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};
use tracing::debug;
use railseat_core::{CoachClass, CoreResult, Seat, SeatError, SeatId, SeatStatus};

use crate::seat_map::{Coach, SeatMap};

/// Authoritative seat status for one train.
///
/// The seat records themselves never change after the map is built; status
/// is tracked per travel date and only for seats that are not available, so
/// a date with every seat free holds no entry at all. Every status write goes
/// through [`SeatRegistry::transition_status`].
pub struct SeatRegistry {
    train_id: String,
    coaches: Vec<Coach>,
    seats: Vec<Seat>,
    index: HashMap<SeatId, usize>,
    /// date -> seat index -> status, never holding `Available`
    statuses: RwLock<HashMap<NaiveDate, HashMap<usize, SeatStatus>>>,
}

impl SeatRegistry {
    pub fn new(map: SeatMap) -> Self {
        let index = map
            .seats
            .iter()
            .enumerate()
            .map(|(i, seat)| (seat.id(), i))
            .collect();

        Self {
            train_id: map.train_id,
            coaches: map.coaches,
            seats: map.seats,
            index,
            statuses: RwLock::new(HashMap::new()),
        }
    }

    pub fn train_id(&self) -> &str {
        &self.train_id
    }

    pub fn coaches(&self) -> &[Coach] {
        &self.coaches
    }

    pub fn coach(&self, number: u32) -> CoreResult<&Coach> {
        self.coaches
            .iter()
            .find(|c| c.number == number)
            .ok_or_else(|| SeatError::NotFound(format!("coach {} on train {}", number, self.train_id)))
    }

    /// Ordered snapshot of seats as they stand on `date`
    pub fn list_seats(&self, date: NaiveDate, coach: Option<u32>) -> CoreResult<Vec<Seat>> {
        if let Some(number) = coach {
            self.coach(number)?;
        }
        let statuses = self.statuses.read().unwrap_or_else(PoisonError::into_inner);
        let day = statuses.get(&date);

        Ok(self
            .seats
            .iter()
            .enumerate()
            .filter(|(_, seat)| coach.map_or(true, |n| seat.coach == n))
            .map(|(i, seat)| {
                let mut seat = seat.clone();
                seat.status = status_of(day, i);
                seat
            })
            .collect())
    }

    /// Seats of one class that are free on `date`
    pub fn available_in_class(&self, date: NaiveDate, class: CoachClass) -> Vec<Seat> {
        let statuses = self.statuses.read().unwrap_or_else(PoisonError::into_inner);
        let day = statuses.get(&date);

        self.seats
            .iter()
            .enumerate()
            .filter(|(i, seat)| {
                seat.class == class && status_of(day, *i) == SeatStatus::Available
            })
            .map(|(_, seat)| seat.clone())
            .collect()
    }

    pub fn get_seat(&self, date: NaiveDate, id: &SeatId) -> CoreResult<Seat> {
        let i = self.position(id)?;
        let statuses = self.statuses.read().unwrap_or_else(PoisonError::into_inner);
        let mut seat = self.seats[i].clone();
        seat.status = status_of(statuses.get(&date), i);
        Ok(seat)
    }

    /// Atomic compare-and-set of one seat's status on `date`.
    ///
    /// Fails with `Conflict` when the seat is not in `expected`, and with
    /// `InvalidRequest` when the state machine forbids the move.
    pub fn transition_status(
        &self,
        date: NaiveDate,
        id: &SeatId,
        expected: SeatStatus,
        to: SeatStatus,
    ) -> CoreResult<()> {
        let i = self.position(id)?;
        if !expected.can_transition_to(to) {
            return Err(SeatError::InvalidRequest(format!(
                "seat {} cannot move from {} to {}",
                id, expected, to
            )));
        }

        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);

        let actual = status_of(statuses.get(&date), i);
        if actual != expected {
            return Err(SeatError::Conflict(format!(
                "seat {} on train {} is {} on {}, expected {}",
                id, self.train_id, actual, date, expected
            )));
        }

        if to == SeatStatus::Available {
            if let Some(day) = statuses.get_mut(&date) {
                day.remove(&i);
                if day.is_empty() {
                    statuses.remove(&date);
                }
            }
        } else {
            statuses.entry(date).or_default().insert(i, to);
        }

        debug!(train_id = %self.train_id, %date, seat = %id, from = %expected, to = %to, "Seat status changed");
        Ok(())
    }

    /// Count seats per status on `date`; every status is present in the result
    pub fn count_by_status(&self, date: NaiveDate, coach: Option<u32>) -> CoreResult<BTreeMap<SeatStatus, usize>> {
        let mut counts: BTreeMap<SeatStatus, usize> = SeatStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for seat in self.list_seats(date, coach)? {
            *counts.entry(seat.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Number of travel dates holding at least one seat that is not available
    pub fn tracked_dates(&self) -> usize {
        self.statuses.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn position(&self, id: &SeatId) -> CoreResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| SeatError::NotFound(format!("seat {} on train {}", id, self.train_id)))
    }
}

fn status_of(day: Option<&HashMap<usize, SeatStatus>>, index: usize) -> SeatStatus {
    day.and_then(|d| d.get(&index).copied()).unwrap_or(SeatStatus::Available)
}
