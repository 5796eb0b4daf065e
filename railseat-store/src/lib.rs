pub mod app_config;
pub mod booking_client;

pub use app_config::{Config, ConfigError};
pub use booking_client::{HttpBookingDirectory, LocalBookingDirectory};
