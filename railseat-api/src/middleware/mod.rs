pub mod resiliency;

pub use resiliency::{BreakerGuardedDirectory, CircuitBreaker, CircuitState};
