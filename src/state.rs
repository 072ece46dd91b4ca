use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::config::AppConfig;
use crate::services::DeckService;
use crate::validation::{DeckCreateSchema, DeckUpdateSchema};

/// Collaborators shared by every deck handler.
///
/// Nothing in here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub decks: Arc<dyn DeckService>,
    pub deck_update_schema: Arc<DeckUpdateSchema>,
    pub deck_create_schema: Arc<DeckCreateSchema>,
    /// Upper bound for a buffered request body, checked after the caller is known
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>, decks: Arc<dyn DeckService>, config: &AppConfig) -> Self {
        Self {
            identity,
            decks,
            deck_update_schema: Arc::new(DeckUpdateSchema::new(&config.validation)),
            deck_create_schema: Arc::new(DeckCreateSchema::new(&config.validation)),
            max_body_bytes: config.api.max_request_size_bytes,
        }
    }
}
