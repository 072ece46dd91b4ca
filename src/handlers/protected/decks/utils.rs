use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use axum::{
    body::{Body, Bytes},
    extract::Path,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures::{FutureExt, StreamExt};
use serde_json::Value;

use crate::auth::AuthenticatedUser;
use crate::error::{map_domain_error, map_error, ApiError, ErrorCode};
use crate::services::DomainError;
use crate::state::AppState;
use crate::validation::Schema;

/// Why a handler pipeline stopped early
#[derive(Debug)]
pub enum PipelineError {
    /// Detected locally before any service call; answered as-is
    Rejected(ApiError),
    /// Raised by a collaborator; answered through the error mapper
    Failed(anyhow::Error),
}

impl From<ApiError> for PipelineError {
    fn from(err: ApiError) -> Self {
        PipelineError::Rejected(err)
    }
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Failed(err)
    }
}

pub type PipelineResult = Result<Response, PipelineError>;

/// Run a handler pipeline behind the outer safety net.
///
/// Rejections are returned untouched, raised failures go through
/// [`map_error`], and a panic becomes a generic internal error.
pub async fn guarded<F>(operation: &'static str, pipeline: F) -> Response
where
    F: Future<Output = PipelineResult> + Send,
{
    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(Ok(response)) => response,
        Ok(Err(PipelineError::Rejected(err))) => {
            tracing::debug!("Rejected {} request: {}", operation, err);
            err.into_response()
        }
        Ok(Err(PipelineError::Failed(err))) => {
            let mapped = map_error(&err);
            if mapped.status_code().is_server_error() {
                tracing::error!("Error {}: {:#}", operation, err);
            } else {
                tracing::warn!("Error {}: {:#}", operation, err);
            }
            mapped.into_response()
        }
        Err(panic) => {
            tracing::error!("Panic while {}: {}", operation, panic_message(&*panic));
            ApiError::internal_server_error().into_response()
        }
    }
}

/// Answer an explicit domain failure returned by a service
pub fn domain_failure(operation: &'static str, err: &DomainError) -> Response {
    let mapped = map_domain_error(err);
    if mapped.status_code().is_server_error() {
        tracing::error!("Error {}: {}", operation, err);
    } else {
        tracing::warn!("Error {}: {}", operation, err);
    }
    mapped.into_response()
}

/// Resolve the caller or reject with the handler's unauthenticated code
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    unauthenticated: ErrorCode,
) -> Result<AuthenticatedUser, PipelineError> {
    match state.identity.resolve_caller(headers).await? {
        Some(user) => Ok(user),
        None => Err(ApiError::unauthenticated(unauthenticated).into()),
    }
}

pub fn require_deck_id(path: Option<Path<String>>) -> Result<String, ApiError> {
    match path {
        Some(Path(deck_id)) if !deck_id.trim().is_empty() => Ok(deck_id),
        _ => Err(ApiError::missing_identifier()),
    }
}

/// Buffer the request body, stopping as soon as it passes `limit` bytes.
///
/// Called only once the caller and the path are accepted, so an oversize
/// body never hides a 401.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, ApiError> {
    let mut stream = body.into_data_stream();
    let mut buffered = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            ApiError::invalid_body()
        })?;
        if buffered.len() + chunk.len() > limit {
            return Err(ApiError::payload_too_large());
        }
        buffered.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(buffered))
}

/// Parse the raw body. Failing here is distinct from failing the schema.
pub fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Unparsable request body: {}", e);
        ApiError::invalid_body()
    })
}

pub fn validate<S: Schema>(schema: &S, raw: &Value, message: &str) -> Result<S::Output, ApiError> {
    schema
        .safe_validate(raw)
        .map_err(|details| ApiError::validation_error(message, Some(details)))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
