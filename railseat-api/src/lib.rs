use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod state;

pub use state::AppState;

use handlers::{health, reservations, trains};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::USER_AGENT]);

    Router::new()
        .route("/", get(health::root))
        .route("/trains", get(trains::list_trains))
        .route("/trains/{train}", get(trains::get_train))
        .route("/trains/{train}/seat-map", get(trains::seat_map))
        .route("/trains/{train}/coaches/{coach}/seats", get(trains::coach_seats))
        .route("/trains/{train}/availability", get(trains::availability))
        .route("/trains/{train}/seats/{seat}/status", put(trains::set_seat_status))
        .route("/trains/{train}/stream", get(trains::stream))
        .route("/seat-reservations", post(reservations::reserve))
        .route("/bookings/{id}/seats", get(reservations::get_reservation))
        .route("/bookings/{id}/seats/status", get(reservations::booking_status))
        .route("/bookings/{id}/seats/cancel", put(reservations::cancel))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
