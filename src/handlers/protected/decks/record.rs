use axum::{
    body::Body,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};

use crate::api::ApiResponse;
use crate::error::ErrorCode;
use crate::state::AppState;

use super::utils::{
    authenticate, domain_failure, guarded, parse_json_body, read_body, require_deck_id, validate,
    PipelineResult,
};

/// GET /api/decks/:deckId - Fetch one of the caller's decks
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    deck_id: Option<Path<String>>,
) -> Response {
    guarded("fetching deck", fetch(state, headers, deck_id)).await
}

async fn fetch(state: AppState, headers: HeaderMap, deck_id: Option<Path<String>>) -> PipelineResult {
    let user = authenticate(&state, &headers, ErrorCode::Unauthorized).await?;
    let deck_id = require_deck_id(deck_id)?;

    let deck = state.decks.get_by_id(&user, &deck_id).await?;

    Ok(ApiResponse::Ok(deck).into_response())
}

/// PUT /api/decks/:deckId - Replace the editable fields of a deck
///
/// Order is part of the contract: identity, then path, then body read and
/// parse, then schema, then the service call. The service reports its failures as
/// a value rather than raising.
pub async fn put(
    State(state): State<AppState>,
    headers: HeaderMap,
    deck_id: Option<Path<String>>,
    body: Body,
) -> Response {
    guarded("updating deck", replace(state, headers, deck_id, body)).await
}

async fn replace(
    state: AppState,
    headers: HeaderMap,
    deck_id: Option<Path<String>>,
    body: Body,
) -> PipelineResult {
    let user = authenticate(&state, &headers, ErrorCode::AuthenticationFailed).await?;
    let deck_id = require_deck_id(deck_id)?;
    let body = read_body(body, state.max_body_bytes).await?;
    let raw = parse_json_body(&body)?;
    let payload = validate(state.deck_update_schema.as_ref(), &raw, "Invalid input data for update.")?;

    match state.decks.update(&user, &deck_id, payload).await? {
        Ok(deck) => Ok(ApiResponse::Ok(deck).into_response()),
        Err(err) => Ok(domain_failure("updating deck", &err)),
    }
}

/// DELETE /api/decks/:deckId - Remove a deck. No body is read.
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    deck_id: Option<Path<String>>,
) -> Response {
    guarded("deleting deck", remove(state, headers, deck_id)).await
}

async fn remove(state: AppState, headers: HeaderMap, deck_id: Option<Path<String>>) -> PipelineResult {
    let user = authenticate(&state, &headers, ErrorCode::Unauthorized).await?;
    let deck_id = require_deck_id(deck_id)?;

    state.decks.delete(&user, &deck_id).await?;
    tracing::info!("User {} deleted deck {}", user, deck_id);

    Ok(ApiResponse::no_content().into_response())
}
