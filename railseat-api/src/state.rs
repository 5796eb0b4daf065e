use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use railseat_catalog::TrainCatalog;
use railseat_core::BookingDirectory;
use railseat_order::{AllocationEngine, CancellationOutbox, ReservationLedger};
use railseat_store::{Config, HttpBookingDirectory, LocalBookingDirectory};

use crate::metrics::SeatMetrics;
use crate::middleware::{BreakerGuardedDirectory, CircuitBreaker};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AllocationEngine>,
    pub metrics: Arc<SeatMetrics>,
}

impl AppState {
    /// Wire catalog, ledger, booking directory and notifier from configuration.
    ///
    /// Must run inside a tokio runtime; the returned handle is the
    /// cancellation notifier task.
    pub fn from_config(config: &Config) -> anyhow::Result<(Self, JoinHandle<()>)> {
        let catalog = TrainCatalog::build(config.trains.clone(), &config.layouts, config.pricing.clone())?;

        let directory: Arc<dyn BookingDirectory> = match &config.booking_service.url {
            Some(url) => {
                let service = &config.booking_service;
                let client = HttpBookingDirectory::new(url, Duration::from_millis(service.timeout_ms))?;
                let breaker = CircuitBreaker::new(
                    "booking-service",
                    service.breaker_threshold as usize,
                    Duration::from_secs(service.breaker_reset_seconds),
                );
                tracing::info!("Using booking service at {}", url);
                Arc::new(BreakerGuardedDirectory::new(client, breaker))
            }
            None => {
                tracing::warn!("No booking service configured; every booking id is accepted");
                Arc::new(LocalBookingDirectory)
            }
        };

        Self::with_directory(catalog, directory, config.notifications.queue_capacity)
    }

    pub fn with_directory(
        catalog: TrainCatalog,
        directory: Arc<dyn BookingDirectory>,
        queue_capacity: usize,
    ) -> anyhow::Result<(Self, JoinHandle<()>)> {
        let (outbox, notifier) = CancellationOutbox::spawn(directory.clone(), queue_capacity);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let engine = AllocationEngine::new(
            Arc::new(catalog),
            Arc::new(ReservationLedger::new()),
            directory,
            outbox,
            events,
        );

        let state = Self {
            engine: Arc::new(engine),
            metrics: Arc::new(SeatMetrics::new()?),
        };
        Ok((state, notifier))
    }
}
