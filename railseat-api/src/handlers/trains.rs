use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::NaiveDate;
use futures_util::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use railseat_catalog::TrainInfo;
use railseat_core::{CoachClass, Seat, SeatId, SeatStatus};
use railseat_order::TrainAvailability;

use super::TravelDateQuery;
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CoachSummary {
    pub coach_number: u32,
    pub label: String,
    pub class: CoachClass,
    pub rows: u32,
    pub seats_per_row: u32,
    pub layout: String,
    pub total: usize,
    pub available: usize,
}

#[derive(Debug, Serialize)]
pub struct SeatMapResponse {
    pub train_id: String,
    pub travel_date: NaiveDate,
    pub coaches: Vec<CoachSummary>,
    pub total: usize,
    pub available: usize,
}

impl From<TrainAvailability> for SeatMapResponse {
    fn from(report: TrainAvailability) -> Self {
        Self {
            train_id: report.train_id,
            travel_date: report.travel_date,
            coaches: report
                .coaches
                .into_iter()
                .map(|c| CoachSummary {
                    coach_number: c.coach_number,
                    label: c.label,
                    class: c.class,
                    rows: c.rows,
                    seats_per_row: c.seats_per_row,
                    layout: c.layout,
                    total: c.counts.total,
                    available: c.counts.available,
                })
                .collect(),
            total: report.overall.total,
            available: report.overall.available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoachSeatsResponse {
    pub train_id: String,
    pub coach_number: u32,
    pub travel_date: NaiveDate,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub travel_date: Option<NaiveDate>,
    pub class: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetSeatStatusRequest {
    pub status: SeatStatus,
    pub travel_date: NaiveDate,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn list_trains(State(state): State<AppState>) -> Json<Vec<TrainInfo>> {
    Json(state.engine.trains())
}

pub async fn get_train(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
) -> Result<Json<TrainInfo>, AppError> {
    Ok(Json(state.engine.train(&train_id)?))
}

pub async fn seat_map(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
    query: Result<Query<TravelDateQuery>, QueryRejection>,
) -> Result<Json<SeatMapResponse>, AppError> {
    let Query(query) = query?;
    let report = state.engine.availability(&train_id, query.date(), None)?;
    Ok(Json(report.into()))
}

pub async fn coach_seats(
    State(state): State<AppState>,
    Path((train_id, coach)): Path<(String, u32)>,
    query: Result<Query<TravelDateQuery>, QueryRejection>,
) -> Result<Json<CoachSeatsResponse>, AppError> {
    let Query(query) = query?;
    let travel_date = query.date();
    let seats = state.engine.coach_seats(&train_id, coach, travel_date)?;
    Ok(Json(CoachSeatsResponse {
        train_id,
        coach_number: coach,
        travel_date,
        seats,
    }))
}

pub async fn availability(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<TrainAvailability>, AppError> {
    let Query(query) = query?;
    let class = query.class.as_deref().map(str::parse::<CoachClass>).transpose()?;
    let travel_date = TravelDateQuery { travel_date: query.travel_date }.date();
    Ok(Json(state.engine.availability(&train_id, travel_date, class)?))
}

pub async fn set_seat_status(
    State(state): State<AppState>,
    Path((train_id, seat)): Path<(String, String)>,
    payload: Result<Json<SetSeatStatusRequest>, JsonRejection>,
) -> Result<Json<Seat>, AppError> {
    let Json(req) = payload?;
    let seat_id: SeatId = seat.parse()?;
    let updated = state.engine.set_seat_status(&train_id, &seat_id, req.status, req.travel_date)?;
    Ok(Json(updated))
}

/// Server-sent stream of status changes for one train
pub async fn stream(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    state.engine.train(&train_id)?;
    let rx = state.engine.subscribe();

    let events = BroadcastStream::new(rx).filter_map(move |result| {
        let train_id = train_id.clone();
        async move {
            match result {
                Ok(event) if event.train_id == train_id => Event::default()
                    .event("seat_status_changed")
                    .json_data(&event)
                    .ok()
                    .map(Ok::<Event, Infallible>),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(train = %train_id, "Seat stream lagged: {}", e);
                    None
                }
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
