use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use railseat_core::BookingDirectory;
use railseat_shared::models::events::ReservationCancelledEvent;

/// Outbound queue of cancellation notices for the booking service.
///
/// Enqueueing never blocks and never fails the caller; a full or closed
/// queue drops the notice with a warning.
#[derive(Clone)]
pub struct CancellationOutbox {
    tx: mpsc::Sender<ReservationCancelledEvent>,
}

impl CancellationOutbox {
    /// Start the background notifier and return the queue feeding it
    pub fn spawn(directory: Arc<dyn BookingDirectory>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(run_notifier(rx, directory));
        (Self { tx }, handle)
    }

    pub fn enqueue(&self, event: ReservationCancelledEvent) {
        let booking_id = event.booking_id;
        if let Err(e) = self.tx.try_send(event) {
            warn!(%booking_id, "Dropping cancellation notice: {}", e);
        }
    }
}

async fn run_notifier(mut rx: mpsc::Receiver<ReservationCancelledEvent>, directory: Arc<dyn BookingDirectory>) {
    info!("Cancellation notifier started");

    while let Some(event) = rx.recv().await {
        match directory.notify_cancelled(event.booking_id).await {
            Ok(()) => info!(booking_id = %event.booking_id, train = %event.train_id, "Booking service notified of cancellation"),
            // Reconciled later by the booking service; local state stays released
            Err(e) => error!(booking_id = %event.booking_id, "Error notifying booking service about cancellation: {}", e),
        }
    }

    info!("Cancellation notifier stopped");
}
