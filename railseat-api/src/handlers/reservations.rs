use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;
use railseat_core::Seat;
use railseat_order::{BookingSeatStatus, Reservation, ReservationDetails, ReserveRequest};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingSeatStatusResponse {
    pub booking_id: Uuid,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub train_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<Vec<Seat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub booking_id: Uuid,
    pub status: &'static str,
    pub released_seats: usize,
}

pub async fn reserve(
    State(state): State<AppState>,
    payload: Result<Json<ReserveRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let Json(req) = payload?;
    let started = Instant::now();
    let result = state.engine.reserve(req).await;
    state.metrics.record_reservation(result.as_ref().map(|_| ()), started.elapsed());

    Ok((StatusCode::CREATED, Json(result?)))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<ReservationDetails>, AppError> {
    Ok(Json(state.engine.get_reservation(booking_id)?))
}

pub async fn booking_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingSeatStatusResponse>, AppError> {
    let response = match state.engine.booking_status(booking_id).await? {
        BookingSeatStatus::Confirmed(details) => BookingSeatStatusResponse {
            booking_id,
            status: "confirmed",
            train_id: Some(details.train_id),
            seats: Some(details.seats),
            fare: Some(details.fare),
        },
        BookingSeatStatus::Unconfirmed => BookingSeatStatusResponse {
            booking_id,
            status: "unconfirmed",
            train_id: None,
            seats: None,
            fare: None,
        },
    };
    Ok(Json(response))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let released = state.engine.cancel(booking_id).await?;
    state.metrics.record_cancellation();

    Ok(Json(CancelResponse {
        booking_id,
        status: "cancelled",
        released_seats: released.seats.len(),
    }))
}
