use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;
use railseat_core::{BookingDirectory, DirectoryError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitState {
    Closed,   // Calls flow
    Open,     // Failing fast
    HalfOpen, // Probing after the reset timeout
}

pub struct CircuitBreaker {
    pub name: String,
    state: RwLock<CircuitState>,
    failure_count: AtomicUsize,
    failure_threshold: usize,
    reset_timeout: Duration,
    last_failure: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new(name: &str, threshold: usize, reset_timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicUsize::new(0),
            failure_threshold: threshold.max(1),
            reset_timeout,
            last_failure: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> CircuitState {
        *self.state.read().await
    }

    /// Whether a call may go through right now
    pub async fn check(&self) -> bool {
        let state = *self.state.read().await;
        match state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let last_fail = *self.last_failure.read().await;
                match last_fail {
                    Some(instant) if instant.elapsed() >= self.reset_timeout => {
                        *self.state.write().await = CircuitState::HalfOpen;
                        tracing::info!("Circuit Breaker [{}] moving to Half-Open", self.name);
                        true
                    }
                    Some(_) | None => false,
                }
            }
        }
    }

    pub async fn record_success(&self) {
        let mut state = self.state.write().await;
        if *state == CircuitState::HalfOpen {
            tracing::info!("Circuit Breaker [{}] recovered to Closed", self.name);
        }
        *state = CircuitState::Closed;
        self.failure_count.store(0, Ordering::SeqCst);
    }

    pub async fn record_failure(&self) {
        let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;

        if count >= self.failure_threshold || *state == CircuitState::HalfOpen {
            *state = CircuitState::Open;
            *self.last_failure.write().await = Some(Instant::now());
            tracing::error!("Circuit Breaker [{}] TRIPPED to Open. Failures: {}", self.name, count);
        }
    }
}

/// Booking directory behind a circuit breaker; an open circuit fails fast.
pub struct BreakerGuardedDirectory<D> {
    inner: D,
    breaker: CircuitBreaker,
}

impl<D: BookingDirectory> BreakerGuardedDirectory<D> {
    pub fn new(inner: D, breaker: CircuitBreaker) -> Self {
        Self { inner, breaker }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn observe<T>(&self, result: Result<T, DirectoryError>) -> Result<T, DirectoryError> {
        match &result {
            Ok(_) => self.breaker.record_success().await,
            Err(e) => {
                tracing::warn!("Booking service call failed: {}", e);
                self.breaker.record_failure().await;
            }
        }
        result
    }
}

#[async_trait]
impl<D: BookingDirectory> BookingDirectory for BreakerGuardedDirectory<D> {
    async fn exists(&self, booking_id: Uuid) -> Result<bool, DirectoryError> {
        if !self.breaker.check().await {
            return Err(DirectoryError::CircuitOpen);
        }
        let result = self.inner.exists(booking_id).await;
        self.observe(result).await
    }

    async fn notify_cancelled(&self, booking_id: Uuid) -> Result<(), DirectoryError> {
        if !self.breaker.check().await {
            return Err(DirectoryError::CircuitOpen);
        }
        let result = self.inner.notify_cancelled(booking_id).await;
        self.observe(result).await
    }
}
