use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use railseat_api::{app, AppState};
use railseat_catalog::{ClassLayout, SeatPricing, TrainCatalog, TrainInfo};
use railseat_store::LocalBookingDirectory;

const DATE: &str = "2026-11-20";

fn test_app() -> Router {
    let catalog = TrainCatalog::build(TrainInfo::standard(), &ClassLayout::standard(), SeatPricing::default()).unwrap();
    let (state, _notifier) = AppState::with_directory(catalog, Arc::new(LocalBookingDirectory), 16).unwrap();
    app(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn reserve_body(booking_id: Uuid, train: &str, class: &str, count: usize) -> Value {
    json!({
        "booking_id": booking_id,
        "train_id": train,
        "travel_date": DATE,
        "class": class,
        "passenger_count": count,
    })
}

#[tokio::test]
async fn test_health_and_catalog() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/trains", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/trains/TRN002", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Coastal Link");

    let (status, body) = send(&app, "GET", "/trains/TRN404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_seat_map_and_coach_seats() {
    let app = test_app();

    let (status, body) = send(&app, "GET", &format!("/trains/TRN001/seat-map?travel_date={DATE}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["coaches"].as_array().unwrap().len(), 6);
    assert_eq!(body["total"], 24 + 2 * 40 + 3 * 80);
    assert_eq!(body["available"], body["total"]);
    assert_eq!(body["coaches"][1]["label"], "B2");
    assert_eq!(body["coaches"][1]["layout"], "2-2");

    let (status, body) = send(&app, "GET", &format!("/trains/TRN001/coaches/1/seats?travel_date={DATE}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let seats = body["seats"].as_array().unwrap();
    assert_eq!(seats.len(), 24);
    assert_eq!(seats[0]["code"], "1A");
    assert_eq!(seats[0]["seat_type"], "window");
    assert_eq!(seats[2]["seat_type"], "single");

    let (status, _) = send(&app, "GET", &format!("/trains/TRN001/coaches/9/seats?travel_date={DATE}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reservation_lifecycle() {
    let app = test_app();
    let booking_id = Uuid::new_v4();

    let (status, body) = send(&app, "POST", "/seat-reservations", Some(reserve_body(booking_id, "TRN001", "Business", 4))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["seats"], json!(["2-1A", "2-1B", "2-1C", "2-1D"]));

    let (status, body) = send(&app, "GET", &format!("/bookings/{booking_id}/seats"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fare"], 450.0);
    assert_eq!(body["seats"][0]["status"], "reserved");

    let (status, body) = send(&app, "GET", &format!("/bookings/{booking_id}/seats/status"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    let (_, body) = send(&app, "GET", &format!("/trains/TRN001/availability?travel_date={DATE}&class=business"), None).await;
    assert_eq!(body["coaches"].as_array().unwrap().len(), 2);
    assert_eq!(body["reserved"], 4);
    assert_eq!(body["available"], 76);

    let (status, body) = send(&app, "PUT", &format!("/bookings/{booking_id}/seats/cancel"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["released_seats"], 4);

    let (status, _) = send(&app, "GET", &format!("/bookings/{booking_id}/seats"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &format!("/bookings/{booking_id}/seats/status"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unconfirmed");

    // Same seats come back for a fresh booking
    let (status, body) = send(&app, "POST", "/seat-reservations", Some(reserve_body(Uuid::new_v4(), "TRN001", "Business", 4))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["seats"], json!(["2-1A", "2-1B", "2-1C", "2-1D"]));
}

#[tokio::test]
async fn test_reservation_errors() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/seat-reservations", Some(reserve_body(Uuid::new_v4(), "TRN002", "First Class", 25))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT");

    let (status, body) = send(&app, "POST", "/seat-reservations", Some(reserve_body(Uuid::new_v4(), "TRN002", "Business", 1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, body) = send(&app, "POST", "/seat-reservations", Some(reserve_body(Uuid::new_v4(), "TRN404", "Economy", 1))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let taken = Uuid::new_v4();
    let mut first = reserve_body(taken, "TRN003", "Economy", 1);
    first["preferred_seats"] = json!(["4-1a"]);
    let (status, body) = send(&app, "POST", "/seat-reservations", Some(first)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["seats"], json!(["4-1A"]));

    let mut second = reserve_body(Uuid::new_v4(), "TRN003", "Economy", 1);
    second["preferred_seats"] = json!(["4-1A"]);
    let (status, body) = send(&app, "POST", "/seat-reservations", Some(second)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "UNAVAILABLE");

    let (status, _) = send(&app, "PUT", &format!("/bookings/{}/seats/cancel", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_administrative_status_override() {
    let app = test_app();
    let uri = "/trains/TRN001/seats/1-1A/status";

    let (status, body) = send(&app, "PUT", uri, Some(json!({"status": "maintenance", "travel_date": DATE}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "maintenance");

    let (_, body) = send(&app, "GET", &format!("/trains/TRN001/availability?travel_date={DATE}&class=First%20Class"), None).await;
    assert_eq!(body["maintenance"], 1);
    assert_eq!(body["available"], 23);

    // Another date is unaffected
    let (_, body) = send(&app, "GET", "/trains/TRN001/availability?travel_date=2026-11-21&class=First%20Class", None).await;
    assert_eq!(body["available"], 24);

    let (status, body) = send(&app, "PUT", uri, Some(json!({"status": "reserved", "travel_date": DATE}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, _) = send(&app, "PUT", "/trains/TRN001/seats/not-a-seat/status", Some(json!({"status": "blocked", "travel_date": DATE}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_track_outcomes() {
    let app = test_app();

    send(&app, "POST", "/seat-reservations", Some(reserve_body(Uuid::new_v4(), "TRN001", "Economy", 2))).await;
    send(&app, "POST", "/seat-reservations", Some(reserve_body(Uuid::new_v4(), "TRN002", "First Class", 30))).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("railseat_reservations_committed_total 1"));
    assert!(text.contains("railseat_reservation_failures_total{code=\"INSUFFICIENT\"} 1"));
}

async fn send_raw(app: &Router, method: &str, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let app = test_app();

    let cases = [
        ("POST", "/seat-reservations", Some("application/json"), "{\"booking_id\": 5}"),
        ("POST", "/seat-reservations", Some("application/json"), "not json"),
        ("POST", "/seat-reservations", None, "{}"),
        ("PUT", "/trains/TRN001/seats/1-1A/status", Some("application/json"), "{\"status\": \"melted\"}"),
        ("PUT", "/trains/TRN001/seats/1-1A/status", Some("application/json"), "{"),
    ];
    for (method, uri, content_type, body) in cases {
        let (status, value) = send_raw(&app, method, uri, content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri} {body}");
        assert_eq!(value["code"], "INVALID_REQUEST", "{method} {uri} {body}");
        assert!(value["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    let (status, body) = send(&app, "GET", "/trains/TRN001/seat-map?travel_date=tomorrow", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    // Rejected payloads leave the seat untouched.
    let (status, body) = send(&app, "GET", &format!("/trains/TRN001/coaches/1/seats?travel_date={DATE}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seats"][0]["status"], "available");
}
