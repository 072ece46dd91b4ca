use axum::{
    body::Body,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::api::ApiResponse;
use crate::error::ErrorCode;
use crate::state::AppState;

use super::utils::{
    authenticate, domain_failure, guarded, parse_json_body, read_body, validate, PipelineResult,
};

/// GET /api/decks - List the caller's decks, newest first
pub async fn get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    guarded("listing decks", list(state, headers)).await
}

async fn list(state: AppState, headers: HeaderMap) -> PipelineResult {
    let user = authenticate(&state, &headers, ErrorCode::Unauthorized).await?;

    let decks = state.decks.list(&user).await?;

    Ok(ApiResponse::Ok(decks).into_response())
}

/// POST /api/decks - Create a deck owned by the caller
pub async fn post(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    guarded("creating deck", create(state, headers, body)).await
}

async fn create(state: AppState, headers: HeaderMap, body: Body) -> PipelineResult {
    let user = authenticate(&state, &headers, ErrorCode::Unauthorized).await?;
    let body = read_body(body, state.max_body_bytes).await?;
    let raw = parse_json_body(&body)?;
    let payload = validate(
        state.deck_create_schema.as_ref(),
        &raw,
        "Invalid input data for deck creation.",
    )?;

    match state.decks.create(&user, payload).await? {
        Ok(deck) => Ok(ApiResponse::Created(deck).into_response()),
        Err(err) => Ok(domain_failure("creating deck", &err)),
    }
}
