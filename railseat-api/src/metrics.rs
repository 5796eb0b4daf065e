use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;
use railseat_core::SeatError;

use crate::error::AppError;
use crate::state::AppState;

/// Allocation counters and latency, exported at `/metrics`
pub struct SeatMetrics {
    registry: Registry,
    reservations_committed: IntCounter,
    reservation_failures: IntCounterVec,
    cancellations: IntCounter,
    allocation_seconds: Histogram,
}

impl SeatMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("railseat".to_string()), None)?;

        let reservations_committed = IntCounter::new("reservations_committed_total", "Seat reservations committed")?;
        registry.register(Box::new(reservations_committed.clone()))?;

        let reservation_failures = IntCounterVec::new(
            Opts::new("reservation_failures_total", "Seat reservations rejected, by error code"),
            &["code"],
        )?;
        registry.register(Box::new(reservation_failures.clone()))?;

        let cancellations = IntCounter::new("cancellations_total", "Seat reservations cancelled")?;
        registry.register(Box::new(cancellations.clone()))?;

        let allocation_seconds = Histogram::with_opts(
            HistogramOpts::new("allocation_duration_seconds", "Time spent allocating seats")
                .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5]),
        )?;
        registry.register(Box::new(allocation_seconds.clone()))?;

        Ok(Self {
            registry,
            reservations_committed,
            reservation_failures,
            cancellations,
            allocation_seconds,
        })
    }

    pub fn record_reservation(&self, outcome: Result<(), &SeatError>, elapsed: Duration) {
        self.allocation_seconds.observe(elapsed.as_secs_f64());
        match outcome {
            Ok(()) => self.reservations_committed.inc(),
            Err(err) => self.reservation_failures.with_label_values(&[err.code()]).inc(),
        }
    }

    pub fn record_cancellation(&self) {
        self.cancellations.inc();
    }

    /// Prometheus text exposition of every registered metric
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.export()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}
