use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use railseat_core::SeatError;

#[derive(Debug)]
pub enum AppError {
    Seat(SeatError),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Seat(err) => match err {
                SeatError::NotFound(_) => StatusCode::NOT_FOUND,
                SeatError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                SeatError::Unavailable(_) | SeatError::Insufficient { .. } | SeatError::Conflict(_) => {
                    StatusCode::CONFLICT
                }
                SeatError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                SeatError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, code) = match self {
            AppError::Seat(SeatError::Configuration(msg)) => {
                tracing::error!("Configuration error while serving request: {}", msg);
                ("Internal Server Error".to_string(), "CONFIGURATION_ERROR")
            }
            AppError::Seat(err) => (err.to_string(), err.code()),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                ("Internal Server Error".to_string(), "INTERNAL")
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<SeatError> for AppError {
    fn from(err: SeatError) -> Self {
        Self::Seat(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Seat(SeatError::InvalidRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Seat(SeatError::InvalidRequest(rejection.body_text()))
    }
}

impl From<prometheus::Error> for AppError {
    fn from(err: prometheus::Error) -> Self {
        Self::Anyhow(err.into())
    }
}
