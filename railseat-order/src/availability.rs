use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;
use railseat_catalog::TrainEntry;
use railseat_core::{CoachClass, CoreResult, SeatStatus};

use crate::ledger::ReservationLedger;

/// Seat counts for one coach, one class, or a whole train
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatCounts {
    pub total: usize,
    pub available: usize,
    pub reserved: usize,
    pub occupied: usize,
    pub maintenance: usize,
    pub blocked: usize,
}

impl SeatCounts {
    fn add(&mut self, other: &SeatCounts) {
        self.total += other.total;
        self.available += other.available;
        self.reserved += other.reserved;
        self.occupied += other.occupied;
        self.maintenance += other.maintenance;
        self.blocked += other.blocked;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoachAvailability {
    pub coach_number: u32,
    pub label: String,
    pub class: CoachClass,
    pub rows: u32,
    pub seats_per_row: u32,
    pub layout: String,
    #[serde(flatten)]
    pub counts: SeatCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainAvailability {
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub coaches: Vec<CoachAvailability>,
    pub classes: BTreeMap<CoachClass, SeatCounts>,
    #[serde(flatten)]
    pub overall: SeatCounts,
}

/// Count seats on `travel_date`, optionally for one class only.
///
/// `reserved` is the number of seats held by live reservations, or the
/// registry's reserved count when that is higher (a claim not yet committed).
/// `occupied`, `maintenance` and `blocked` come from the registry, and
/// `available` is whatever is left.
pub fn aggregate(
    train: &TrainEntry,
    ledger: &ReservationLedger,
    travel_date: NaiveDate,
    class: Option<CoachClass>,
) -> CoreResult<TrainAvailability> {
    let registry = &train.registry;

    let mut held_per_coach: HashMap<u32, usize> = HashMap::new();
    for reservation in ledger.for_train_date(registry.train_id(), travel_date) {
        for seat in &reservation.seats {
            *held_per_coach.entry(seat.coach).or_insert(0) += 1;
        }
    }

    let mut coaches = Vec::new();
    let mut classes: BTreeMap<CoachClass, SeatCounts> = BTreeMap::new();
    let mut overall = SeatCounts::default();

    for coach in registry.coaches().iter().filter(|c| class.map_or(true, |k| c.class == k)) {
        let by_status = registry.count_by_status(travel_date, Some(coach.number))?;
        let count = |status: SeatStatus| by_status.get(&status).copied().unwrap_or(0);
        let held = held_per_coach.get(&coach.number).copied().unwrap_or(0);
        let registry_reserved = count(SeatStatus::Reserved);
        if held > registry_reserved {
            warn!(
                train = %registry.train_id(),
                coach = coach.number,
                date = %travel_date,
                held,
                registry_reserved,
                "Ledger holds more seats than the registry shows reserved"
            );
        }

        let mut counts = SeatCounts {
            total: by_status.values().sum(),
            reserved: held.max(registry_reserved),
            occupied: count(SeatStatus::Occupied),
            maintenance: count(SeatStatus::Maintenance),
            blocked: count(SeatStatus::Blocked),
            available: 0,
        };
        counts.available = counts
            .total
            .saturating_sub(counts.reserved + counts.occupied + counts.maintenance + counts.blocked);

        classes.entry(coach.class).or_default().add(&counts);
        overall.add(&counts);
        coaches.push(CoachAvailability {
            coach_number: coach.number,
            label: coach.label.clone(),
            class: coach.class,
            rows: coach.rows,
            seats_per_row: coach.seats_per_row,
            layout: coach.layout.clone(),
            counts,
        });
    }

    Ok(TrainAvailability {
        train_id: registry.train_id().to_string(),
        travel_date,
        coaches,
        classes,
        overall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use railseat_catalog::{ClassLayout, SeatPricing, TrainCatalog, TrainInfo};
    use railseat_core::SeatId;
    use uuid::Uuid;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, day).unwrap()
    }

    #[test]
    fn test_counts_are_date_scoped_and_conserved() {
        let catalog = TrainCatalog::build(TrainInfo::standard(), &ClassLayout::standard(), SeatPricing::default()).unwrap();
        let train = catalog.get("TRN002").unwrap();
        let ledger = ReservationLedger::new();

        let seats = vec![SeatId::new(1, "1A"), SeatId::new(1, "1B")];
        for seat in &seats {
            train.registry.transition_status(date(3), seat, SeatStatus::Available, SeatStatus::Reserved).unwrap();
        }
        ledger.commit(Uuid::new_v4(), "TRN002", date(3), CoachClass::FirstClass, seats).unwrap();
        train
            .registry
            .transition_status(date(3), &SeatId::new(2, "1A"), SeatStatus::Available, SeatStatus::Blocked)
            .unwrap();

        let report = aggregate(&train, &ledger, date(3), None).unwrap();
        assert_eq!(report.coaches[0].counts.reserved, 2);
        assert_eq!(report.coaches[0].counts.available, 24 - 2);
        assert_eq!(report.classes[&CoachClass::Economy].blocked, 1);
        for coach in &report.coaches {
            let c = coach.counts;
            assert_eq!(c.available + c.reserved + c.occupied + c.maintenance + c.blocked, c.total);
        }
        assert_eq!(report.overall.total, 24 + 3 * 80);

        let other_day = aggregate(&train, &ledger, date(4), None).unwrap();
        assert_eq!(other_day.overall.available, other_day.overall.total);

        let first_only = aggregate(&train, &ledger, date(3), Some(CoachClass::FirstClass)).unwrap();
        assert_eq!(first_only.coaches.len(), 1);
        assert_eq!(first_only.overall.reserved, 2);

        // A claimed seat not yet committed to the ledger still counts as reserved
        train
            .registry
            .transition_status(date(3), &SeatId::new(1, "2A"), SeatStatus::Available, SeatStatus::Reserved)
            .unwrap();
        let in_flight = aggregate(&train, &ledger, date(3), Some(CoachClass::FirstClass)).unwrap();
        assert_eq!(in_flight.overall.reserved, 3);
        assert_eq!(in_flight.overall.available, 24 - 3);
    }
}
