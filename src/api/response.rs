use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::ApiError;

/// Successful handler outcome. The entity is the whole body, no envelope.
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Ok(T),
    Created(T),
    /// Nothing to return, e.g. after a delete
    NoContent,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiResponse::Ok(_) => StatusCode::OK,
            ApiResponse::Created(_) => StatusCode::CREATED,
            ApiResponse::NoContent => StatusCode::NO_CONTENT,
        }
    }
}

impl ApiResponse<()> {
    pub fn no_content() -> Self {
        ApiResponse::NoContent
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let data = match self {
            ApiResponse::Ok(data) | ApiResponse::Created(data) => data,
            ApiResponse::NoContent => return status.into_response(),
        };

        // Serialize up front so a failure still yields a well-formed error body
        match serde_json::to_value(&data) {
            Ok(value) => (status, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal_server_error().into_response()
            }
        }
    }
}
