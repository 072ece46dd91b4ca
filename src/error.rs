// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::DomainError;
use crate::validation::FieldErrors;

/// Message returned for every failure we don't recognize. Never carries internals.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected internal server error occurred.";

/// Wire error codes shared between client and server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthorized,
    AuthenticationFailed,
    ValidationError,
    NotFound,
    Forbidden,
    DatabaseError,
    Conflict,
    ExternalApiError,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::ExternalApiError => "EXTERNAL_API_ERROR",
            ErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code: {0}")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    /// Exact wire spelling only. This is the explicit table consulted for
    /// domain errors that declare their own name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNAUTHORIZED" => Ok(ErrorCode::Unauthorized),
            "AUTHENTICATION_FAILED" => Ok(ErrorCode::AuthenticationFailed),
            "VALIDATION_ERROR" => Ok(ErrorCode::ValidationError),
            "NOT_FOUND" => Ok(ErrorCode::NotFound),
            "FORBIDDEN" => Ok(ErrorCode::Forbidden),
            "DATABASE_ERROR" => Ok(ErrorCode::DatabaseError),
            "CONFLICT" => Ok(ErrorCode::Conflict),
            "EXTERNAL_API_ERROR" => Ok(ErrorCode::ExternalApiError),
            "INTERNAL_SERVER_ERROR" => Ok(ErrorCode::InternalServerError),
            other => Err(UnknownErrorCode(other.to_string())),
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    ValidationError {
        message: String,
        details: Option<FieldErrors>,
    },

    // 401 Unauthorized (code differs per handler)
    Unauthenticated(ErrorCode),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge,

    // 500 Internal Server Error
    Database(String),
    Domain { code: ErrorCode, message: String },
    InternalServerError,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Domain { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::ValidationError { .. } => ErrorCode::ValidationError,
            ApiError::Unauthenticated(code) => *code,
            ApiError::Forbidden(_) => ErrorCode::Forbidden,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::PayloadTooLarge => ErrorCode::ValidationError,
            ApiError::Database(_) => ErrorCode::DatabaseError,
            ApiError::Domain { code, .. } => *code,
            ApiError::InternalServerError => ErrorCode::InternalServerError,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthenticated(_) => "Authentication required.",
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge => "Request body too large.",
            ApiError::Database(msg) => msg,
            ApiError::Domain { message, .. } => message,
            ApiError::InternalServerError => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Convert to the wire body
    pub fn to_body(&self) -> ApiErrorResponse {
        let details = match self {
            ApiError::ValidationError { details, .. } => details.clone(),
            _ => None,
        };

        ApiErrorResponse {
            error: self.error_code(),
            message: self.message().to_string(),
            details,
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthenticated(code: ErrorCode) -> Self {
        ApiError::Unauthenticated(code)
    }

    pub fn validation_error(message: impl Into<String>, details: Option<FieldErrors>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            details,
        }
    }

    pub fn missing_identifier() -> Self {
        Self::validation_error("Missing deckId in URL.", None)
    }

    pub fn invalid_body() -> Self {
        Self::validation_error("Invalid JSON body.", None)
    }

    pub fn payload_too_large() -> Self {
        ApiError::PayloadTooLarge
    }

    pub fn internal_server_error() -> Self {
        ApiError::InternalServerError
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Translate a recognized domain error into its wire form.
///
/// This is the only place a [`DomainError`] kind becomes a status code.
pub fn map_domain_error(err: &DomainError) -> ApiError {
    match err {
        DomainError::NotFound(msg) => ApiError::NotFound(msg.clone()),
        DomainError::PermissionDenied(msg) => ApiError::Forbidden(msg.clone()),
        DomainError::Database(msg) => ApiError::Database(msg.clone()),
        DomainError::Other { name, message } => match name.parse::<ErrorCode>() {
            Ok(code) => ApiError::Domain {
                code,
                message: message.clone(),
            },
            Err(UnknownErrorCode(name)) => {
                tracing::error!("Domain error '{}' has no wire code: {}", name, message);
                ApiError::internal_server_error()
            }
        },
    }
}

/// Translate any failure escaping a handler pipeline.
///
/// A [`DomainError`] anywhere in the source chain is mapped by
/// [`map_domain_error`]; everything else is an unrecognized failure.
pub fn map_error(err: &anyhow::Error) -> ApiError {
    match err.chain().find_map(|cause| cause.downcast_ref::<DomainError>()) {
        Some(domain) => map_domain_error(domain),
        None => ApiError::internal_server_error(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use serde_json::json;

    #[test]
    fn test_domain_error_mapping_table() {
        let cases = [
            (DomainError::NotFound("gone".into()), StatusCode::NOT_FOUND, ErrorCode::NotFound),
            (
                DomainError::PermissionDenied("nope".into()),
                StatusCode::FORBIDDEN,
                ErrorCode::Forbidden,
            ),
            (
                DomainError::Database("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
            ),
        ];

        for (err, status, code) in cases {
            let mapped = map_domain_error(&err);
            assert_eq!(mapped.status_code(), status, "status for {:?}", err);
            assert_eq!(mapped.error_code(), code, "code for {:?}", err);
            assert_eq!(mapped.message(), err.message());
        }
    }

    #[test]
    fn test_other_domain_error_uses_declared_name() {
        let err = DomainError::other("CONFLICT", "Deck name already taken.");
        let mapped = map_domain_error(&err);

        assert_eq!(mapped.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mapped.error_code(), ErrorCode::Conflict);
        assert_eq!(mapped.message(), "Deck name already taken.");
    }

    #[test]
    fn test_other_domain_error_with_unknown_name_is_internal() {
        let err = DomainError::other("DeckQuotaExceededError", "secret internal detail");
        let mapped = map_domain_error(&err);

        assert_eq!(mapped, ApiError::InternalServerError);
        assert_eq!(mapped.message(), INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_map_error_finds_domain_error_behind_context() {
        let err = Err::<(), _>(DomainError::NotFound("Deck not found.".into()))
            .context("loading deck")
            .unwrap_err();

        let mapped = map_error(&err);
        assert_eq!(mapped.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(mapped.message(), "Deck not found.");
    }

    #[test]
    fn test_map_error_hides_unrecognized_details() {
        let err = anyhow::anyhow!("connection reset by peer at 10.0.0.3:5432");
        let mapped = map_error(&err);

        assert_eq!(mapped.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mapped.error_code(), ErrorCode::InternalServerError);
        assert!(!mapped.message().contains("10.0.0.3"));
    }

    #[test]
    fn test_error_code_parse_matches_serde_spelling() {
        for code in [
            ErrorCode::Unauthorized,
            ErrorCode::AuthenticationFailed,
            ErrorCode::ValidationError,
            ErrorCode::NotFound,
            ErrorCode::Forbidden,
            ErrorCode::DatabaseError,
            ErrorCode::Conflict,
            ErrorCode::ExternalApiError,
            ErrorCode::InternalServerError,
        ] {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
            assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(code));
        }
        assert!("NotFoundError".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_body_omits_details_unless_validation() {
        let body = serde_json::to_value(ApiError::NotFound("x".into()).to_body()).unwrap();
        assert_eq!(body, json!({ "error": "NOT_FOUND", "message": "x" }));

        let mut details = FieldErrors::new();
        details.add("name", "Required");
        let body = serde_json::to_value(
            ApiError::validation_error("Invalid input data for update.", Some(details)).to_body(),
        )
        .unwrap();
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["name"][0], "Required");
    }

    #[test]
    fn test_payload_too_large_keeps_error_contract() {
        let err = ApiError::payload_too_large();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(body, json!({ "error": "VALIDATION_ERROR", "message": "Request body too large." }));
    }

    #[test]
    fn test_unauthenticated_keeps_handler_code() {
        let err = ApiError::unauthenticated(ErrorCode::AuthenticationFailed);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), ErrorCode::AuthenticationFailed);
    }
}
