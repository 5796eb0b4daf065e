use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub endpoints: Vec<&'static str>,
}

pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "railseat",
        status: "ok",
        endpoints: vec![
            "GET /trains",
            "GET /trains/{train}",
            "GET /trains/{train}/seat-map",
            "GET /trains/{train}/coaches/{coach}/seats",
            "GET /trains/{train}/availability",
            "PUT /trains/{train}/seats/{seat}/status",
            "GET /trains/{train}/stream",
            "POST /seat-reservations",
            "GET /bookings/{id}/seats",
            "GET /bookings/{id}/seats/status",
            "PUT /bookings/{id}/seats/cancel",
            "GET /metrics",
        ],
    })
}
