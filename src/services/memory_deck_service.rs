use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::deck_service::{DeckService, DomainError, DomainResult};
use crate::auth::AuthenticatedUser;
use crate::models::{Deck, DeckCreatePayload, DeckUpdatePayload};

/// Process-local deck store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryDeckService {
    decks: Arc<RwLock<HashMap<String, Deck>>>,
}

impl InMemoryDeckService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a deck as-is, replacing any deck with the same id
    pub async fn insert(&self, deck: Deck) {
        self.decks.write().await.insert(deck.id.clone(), deck);
    }

    pub async fn len(&self) -> usize {
        self.decks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.decks.read().await.is_empty()
    }

    fn check_owner(deck: &Deck, user: &AuthenticatedUser) -> DomainResult<()> {
        if deck.user_id != user.id() {
            debug!("User {} denied access to deck {}", user.id(), deck.id);
            return Err(DomainError::PermissionDenied(
                "You do not have permission to access this deck.".to_string(),
            ));
        }
        Ok(())
    }

    fn not_found(deck_id: &str) -> DomainError {
        DomainError::NotFound(format!("Deck with ID {} not found.", deck_id))
    }
}

#[async_trait]
impl DeckService for InMemoryDeckService {
    async fn list(&self, user: &AuthenticatedUser) -> anyhow::Result<Vec<Deck>> {
        let decks = self.decks.read().await;
        let mut owned: Vec<Deck> = decks
            .values()
            .filter(|deck| deck.user_id == user.id())
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn get_by_id(&self, user: &AuthenticatedUser, deck_id: &str) -> anyhow::Result<Deck> {
        let decks = self.decks.read().await;
        let deck = decks.get(deck_id).ok_or_else(|| Self::not_found(deck_id))?;
        Self::check_owner(deck, user)?;
        Ok(deck.clone())
    }

    async fn create(
        &self,
        user: &AuthenticatedUser,
        payload: DeckCreatePayload,
    ) -> anyhow::Result<DomainResult<Deck>> {
        let now = Utc::now();
        let deck = Deck {
            id: Uuid::new_v4().to_string(),
            user_id: user.id().to_string(),
            name: payload.name,
            description: payload.description,
            is_public: payload.is_public,
            created_at: now,
            updated_at: now,
        };

        self.decks.write().await.insert(deck.id.clone(), deck.clone());
        info!("Created deck {} for user {}", deck.id, user.id());
        Ok(Ok(deck))
    }

    async fn update(
        &self,
        user: &AuthenticatedUser,
        deck_id: &str,
        payload: DeckUpdatePayload,
    ) -> anyhow::Result<DomainResult<Deck>> {
        let mut decks = self.decks.write().await;
        let Some(deck) = decks.get_mut(deck_id) else {
            return Ok(Err(Self::not_found(deck_id)));
        };
        if let Err(e) = Self::check_owner(deck, user) {
            return Ok(Err(e));
        }

        payload.apply_to(deck, Utc::now());
        Ok(Ok(deck.clone()))
    }

    async fn delete(&self, user: &AuthenticatedUser, deck_id: &str) -> anyhow::Result<()> {
        let mut decks = self.decks.write().await;
        let deck = decks.get(deck_id).ok_or_else(|| Self::not_found(deck_id))?;
        Self::check_owner(deck, user)?;

        decks.remove(deck_id);
        info!("Deleted deck {} for user {}", deck_id, user.id());
        Ok(())
    }
}
