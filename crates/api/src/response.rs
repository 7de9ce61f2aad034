use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use remark_store::StoreError;

pub type AppSuccess = GenericResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: u16,
    pub message: String,
    pub data: serde_json::Value,
}

impl GenericResponse {
    pub fn new(status: StatusCode, message: &str, data: serde_json::Value) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        }
    }
}

impl IntoResponse for GenericResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

// Make our own error that wraps `anyhow::Error`.
#[derive(Debug)]
pub struct AppError(pub StatusCode, pub anyhow::Error);
impl AppError {
    pub fn new(status: StatusCode, err: anyhow::Error) -> Self {
        Self(status, err)
    }
}

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("CODE: {}, MESSAGE: {}", self.0.as_u16(), self.1);
        GenericResponse::new(self.0, &self.1.to_string(), json!({})).into_response()
    }
}

// This enables using `?` on store calls inside handlers; each error kind
// carries the status code the operation contract requires.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidOrdering(_) | StoreError::InvalidReference(_) => {
                StatusCode::BAD_REQUEST
            }
            StoreError::Database(_) | StoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}
