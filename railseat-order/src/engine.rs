use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use railseat_catalog::{TrainCatalog, TrainEntry, TrainInfo};
use railseat_core::{BookingDirectory, CoachClass, CoreResult, Seat, SeatError, SeatId, SeatStatus};
use railseat_shared::models::events::{ReservationCancelledEvent, SeatStatusChangedEvent};

use crate::availability::{aggregate, TrainAvailability};
use crate::ledger::ReservationLedger;
use crate::models::{BookingSeatStatus, Reservation, ReservationDetails, ReserveRequest};
use crate::outbox::CancellationOutbox;
use crate::scoring::select_seats;

/// Single authority that places parties in seats.
///
/// Each train has an async mutex held across selection, status transitions
/// and the ledger commit, and across cancellation. Reads never take it.
pub struct AllocationEngine {
    catalog: Arc<TrainCatalog>,
    ledger: Arc<ReservationLedger>,
    directory: Arc<dyn BookingDirectory>,
    outbox: CancellationOutbox,
    locks: HashMap<String, Mutex<()>>,
    events: broadcast::Sender<SeatStatusChangedEvent>,
}

impl AllocationEngine {
    pub fn new(
        catalog: Arc<TrainCatalog>,
        ledger: Arc<ReservationLedger>,
        directory: Arc<dyn BookingDirectory>,
        outbox: CancellationOutbox,
        events: broadcast::Sender<SeatStatusChangedEvent>,
    ) -> Self {
        let locks = catalog
            .train_ids()
            .map(|id| (id.to_string(), Mutex::new(())))
            .collect();

        Self {
            catalog,
            ledger,
            directory,
            outbox,
            locks,
            events,
        }
    }

    pub fn trains(&self) -> Vec<TrainInfo> {
        self.catalog.list()
    }

    pub fn train(&self, train_id: &str) -> CoreResult<TrainInfo> {
        Ok(self.catalog.get(train_id)?.info.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SeatStatusChangedEvent> {
        self.events.subscribe()
    }

    /// Allocate seats for a booking and commit them.
    pub async fn reserve(&self, req: ReserveRequest) -> CoreResult<Reservation> {
        // 1. Validate the request shape
        if req.passenger_count == 0 {
            return Err(SeatError::InvalidRequest("passenger_count must be at least 1".to_string()));
        }
        let train = self.catalog.get(&req.train_id)?;
        if !train.info.offers(req.class) {
            return Err(SeatError::InvalidRequest(format!(
                "train {} does not offer {}; available classes: {}",
                req.train_id,
                req.class,
                class_list(&train.info.available_classes)
            )));
        }
        if let Some(preferred) = &req.preferred_seats {
            if preferred.len() != req.passenger_count {
                return Err(SeatError::InvalidRequest(format!(
                    "{} preferred seats given for {} passengers",
                    preferred.len(),
                    req.passenger_count
                )));
            }
            let unique: HashSet<&SeatId> = preferred.iter().collect();
            if unique.len() != preferred.len() {
                return Err(SeatError::InvalidRequest("preferred seats contain duplicates".to_string()));
            }
        }

        // 2. Confirm the booking exists before touching any seat
        if !self.directory.exists(req.booking_id).await? {
            return Err(SeatError::NotFound(format!("booking {}", req.booking_id)));
        }

        // 3. Select, claim and commit under the train lock
        let _guard = self.lock_for(&req.train_id)?.lock().await;

        if self.ledger.contains(&req.booking_id) {
            return Err(SeatError::InvalidRequest(format!(
                "booking {} already holds a seat reservation",
                req.booking_id
            )));
        }

        let seats = self.claim_with_retry(&train, &req, || self.choose(&train, &req))?;

        let ids: Vec<SeatId> = seats.iter().map(Seat::id).collect();
        let reservation = match self.ledger.commit(req.booking_id, &req.train_id, req.travel_date, req.class, ids) {
            Ok(reservation) => reservation,
            Err(e) => {
                self.revert(&train, req.travel_date, &seats, req.booking_id);
                return Err(match e {
                    SeatError::Conflict(detail) => SeatError::InvalidRequest(detail),
                    other => other,
                });
            }
        };

        let seat_list: Vec<String> = reservation.seats.iter().map(ToString::to_string).collect();
        info!(
            booking_id = %req.booking_id,
            train = %req.train_id,
            date = %req.travel_date,
            seats = ?seat_list,
            "Seats reserved"
        );
        Ok(reservation)
    }

    /// Release a booking's seats and queue a notice for the booking service
    pub async fn cancel(&self, booking_id: Uuid) -> CoreResult<Reservation> {
        let train_id = self.ledger.get(&booking_id)?.train_id;
        let train = self.catalog.get(&train_id)?;

        let reservation = {
            let _guard = self.lock_for(&train_id)?.lock().await;
            let reservation = self.ledger.release(&booking_id)?;
            for seat in &reservation.seats {
                match train
                    .registry
                    .transition_status(reservation.travel_date, seat, SeatStatus::Reserved, SeatStatus::Available)
                {
                    Ok(()) => self.publish(&train_id, reservation.travel_date, seat, SeatStatus::Reserved, SeatStatus::Available, Some(booking_id)),
                    Err(e) => error!(%booking_id, seat = %seat, "Failed to free seat on cancellation: {}", e),
                }
            }
            reservation
        };

        self.outbox.enqueue(ReservationCancelledEvent {
            booking_id,
            train_id: reservation.train_id.clone(),
            travel_date: reservation.travel_date,
            seat_ids: reservation.seats.iter().map(ToString::to_string).collect(),
            timestamp: Utc::now().timestamp(),
        });

        info!(%booking_id, train = %train_id, "Seat reservation cancelled");
        Ok(reservation)
    }

    pub fn get_reservation(&self, booking_id: Uuid) -> CoreResult<ReservationDetails> {
        let reservation = self.ledger.get(&booking_id)?;
        let train = self.catalog.get(&reservation.train_id)?;

        let seats = reservation
            .seats
            .iter()
            .map(|id| train.registry.get_seat(reservation.travel_date, id))
            .collect::<CoreResult<Vec<Seat>>>()?;
        let base_fare = train.info.base_fare(reservation.class)?;
        let fare = self.catalog.pricing().fare(base_fare, &seats);

        Ok(ReservationDetails {
            booking_id,
            train_id: reservation.train_id,
            travel_date: reservation.travel_date,
            class: reservation.class,
            seats,
            fare,
            created_at: reservation.created_at,
        })
    }

    /// Whether a booking holds seats, asking the booking service when it does not
    pub async fn booking_status(&self, booking_id: Uuid) -> CoreResult<BookingSeatStatus> {
        match self.get_reservation(booking_id) {
            Ok(details) => Ok(BookingSeatStatus::Confirmed(details)),
            Err(SeatError::NotFound(_)) => {
                if self.directory.exists(booking_id).await? {
                    Ok(BookingSeatStatus::Unconfirmed)
                } else {
                    Err(SeatError::NotFound(format!("booking {}", booking_id)))
                }
            }
            Err(e) => Err(e),
        }
    }

    pub fn availability(
        &self,
        train_id: &str,
        travel_date: NaiveDate,
        class: Option<CoachClass>,
    ) -> CoreResult<TrainAvailability> {
        let train = self.catalog.get(train_id)?;
        if let Some(class) = class {
            if !train.info.offers(class) {
                return Err(SeatError::InvalidRequest(format!("train {} does not offer {}", train_id, class)));
            }
        }
        aggregate(&train, &self.ledger, travel_date, class)
    }

    pub fn coach_seats(&self, train_id: &str, coach: u32, travel_date: NaiveDate) -> CoreResult<Vec<Seat>> {
        self.catalog.get(train_id)?.registry.list_seats(travel_date, Some(coach))
    }

    /// Administrative status override.
    ///
    /// Seats held by a reservation are left alone, and `reserved` can only be
    /// reached through [`AllocationEngine::reserve`].
    pub fn set_seat_status(
        &self,
        train_id: &str,
        seat_id: &SeatId,
        status: SeatStatus,
        travel_date: NaiveDate,
    ) -> CoreResult<Seat> {
        if status == SeatStatus::Reserved {
            return Err(SeatError::InvalidRequest(
                "seats become reserved only through a reservation".to_string(),
            ));
        }
        let train = self.catalog.get(train_id)?;
        let current = train.registry.get_seat(travel_date, seat_id)?;
        let from = current.status;

        match from {
            SeatStatus::Reserved => {
                return Err(SeatError::Unavailable(format!(
                    "seat {} on train {} is held by a reservation on {}",
                    seat_id, train_id, travel_date
                )));
            }
            same if same == status => return Ok(current),
            SeatStatus::Available | SeatStatus::Occupied | SeatStatus::Maintenance | SeatStatus::Blocked => {}
        }

        train
            .registry
            .transition_status(travel_date, seat_id, from, status)
            .map_err(|e| match e {
                SeatError::Conflict(detail) => SeatError::Unavailable(detail),
                other => other,
            })?;
        self.publish(train_id, travel_date, seat_id, from, status, None);
        info!(train = %train_id, seat = %seat_id, date = %travel_date, from = %from, to = %status, "Seat status overridden");

        train.registry.get_seat(travel_date, seat_id)
    }

    fn choose(&self, train: &TrainEntry, req: &ReserveRequest) -> CoreResult<Vec<Seat>> {
        let registry = &train.registry;

        if let Some(preferred) = &req.preferred_seats {
            let mut seats = Vec::with_capacity(preferred.len());
            for id in preferred {
                let coach = registry.coach(id.coach)?;
                if coach.class != req.class {
                    return Err(SeatError::InvalidRequest(format!(
                        "coach {} is {}, not {}",
                        coach.label, coach.class, req.class
                    )));
                }
                let seat = registry.get_seat(req.travel_date, id)?;
                if seat.status != SeatStatus::Available {
                    return Err(SeatError::Unavailable(format!(
                        "seat {} on train {} is {} on {}",
                        id, req.train_id, seat.status, req.travel_date
                    )));
                }
                seats.push(seat);
            }
            return Ok(seats);
        }

        let candidates = registry.available_in_class(req.travel_date, req.class);
        let selection = select_seats(req.class, candidates, req.passenger_count, &req.preferences)?;
        debug!(booking_id = %req.booking_id, policy = ?selection.policy, "Seats selected");
        Ok(selection.seats)
    }

    /// Select and claim seats, selecting afresh once if the first claim
    /// loses a compare-and-set race. A second lost race is `Unavailable`.
    fn claim_with_retry<F>(&self, train: &TrainEntry, req: &ReserveRequest, mut choose: F) -> CoreResult<Vec<Seat>>
    where
        F: FnMut() -> CoreResult<Vec<Seat>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let chosen = choose()?;
            match self.claim(train, req.travel_date, &chosen, req.booking_id) {
                Ok(()) => return Ok(chosen),
                Err(SeatError::Conflict(detail)) if attempt == 1 => {
                    warn!(booking_id = %req.booking_id, train = %req.train_id, "Seat claim lost a race, retrying: {}", detail);
                }
                Err(SeatError::Conflict(detail)) => {
                    return Err(SeatError::Unavailable(format!(
                        "seats on train {} changed while reserving: {}",
                        req.train_id, detail
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Move every chosen seat to `reserved`, undoing this call's moves on failure
    fn claim(&self, train: &TrainEntry, date: NaiveDate, seats: &[Seat], booking_id: Uuid) -> CoreResult<()> {
        for (done, seat) in seats.iter().enumerate() {
            if let Err(e) = train
                .registry
                .transition_status(date, &seat.id(), SeatStatus::Available, SeatStatus::Reserved)
            {
                self.revert_silently(train, date, &seats[..done]);
                return Err(e);
            }
        }
        for seat in seats {
            self.publish(train.registry.train_id(), date, &seat.id(), SeatStatus::Available, SeatStatus::Reserved, Some(booking_id));
        }
        Ok(())
    }

    fn revert(&self, train: &TrainEntry, date: NaiveDate, seats: &[Seat], booking_id: Uuid) {
        self.revert_silently(train, date, seats);
        for seat in seats {
            self.publish(train.registry.train_id(), date, &seat.id(), SeatStatus::Reserved, SeatStatus::Available, Some(booking_id));
        }
    }

    fn revert_silently(&self, train: &TrainEntry, date: NaiveDate, seats: &[Seat]) {
        for seat in seats {
            if let Err(e) = train
                .registry
                .transition_status(date, &seat.id(), SeatStatus::Reserved, SeatStatus::Available)
            {
                error!(seat = %seat.id(), "Failed to revert seat claim: {}", e);
            }
        }
    }

    fn publish(
        &self,
        train_id: &str,
        travel_date: NaiveDate,
        seat: &SeatId,
        from: SeatStatus,
        to: SeatStatus,
        booking_id: Option<Uuid>,
    ) {
        // No subscribers is fine
        let _ = self.events.send(SeatStatusChangedEvent {
            train_id: train_id.to_string(),
            travel_date,
            seat_id: seat.to_string(),
            from_status: from.to_string(),
            to_status: to.to_string(),
            booking_id,
            changed_at: Utc::now().timestamp(),
        });
    }

    fn lock_for(&self, train_id: &str) -> CoreResult<&Mutex<()>> {
        self.locks
            .get(train_id)
            .ok_or_else(|| SeatError::NotFound(format!("train {}", train_id)))
    }
}

fn class_list(classes: &[CoachClass]) -> String {
    classes.iter().map(CoachClass::as_str).collect::<Vec<_>>().join(", ")
}
