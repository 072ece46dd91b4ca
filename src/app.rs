use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::protected::decks;
use crate::state::AppState;

/// Build the full router for the given collaborators
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected: each handler resolves its own caller
        .merge(deck_routes())
        .with_state(state)
        // Global middleware
        .layer(TraceLayer::new_for_http());

    match cors_layer(config) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn deck_routes() -> Router<AppState> {
    Router::new()
        // Collection
        .route("/api/decks", get(decks::collection_get).post(decks::collection_post))
        // Individual deck
        .route(
            "/api/decks/:deckId",
            get(decks::record_get)
                .put(decks::record_put)
                .delete(decks::record_delete),
        )
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.environment == Environment::Development {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Deck API (Rust)",
        "version": version,
        "description": "Per-deck read, update and delete for authenticated owners",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "decks": "/api/decks (protected - list, create)",
            "deck": "/api/decks/:deckId (protected - get, put, delete)",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
