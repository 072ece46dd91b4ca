use async_trait::async_trait;
use thiserror::Error;

use crate::auth::AuthenticatedUser;
use crate::models::{Deck, DeckCreatePayload, DeckUpdatePayload};

/// Recognized failures reported by a deck service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Database(String),

    /// A recognized error outside the fixed kinds. `name` is its declared
    /// wire code name, e.g. `CONFLICT`.
    #[error("{message}")]
    Other { name: String, message: String },
}

impl DomainError {
    pub fn other(name: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Other {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DomainError::NotFound(msg)
            | DomainError::PermissionDenied(msg)
            | DomainError::Database(msg) => msg,
            DomainError::Other { message, .. } => message,
        }
    }
}

/// Explicit outcome of the operations that report domain failures as values
pub type DomainResult<T> = Result<T, DomainError>;

/// Storage-facing deck operations, always scoped to the calling user.
///
/// Two failure styles coexist. Read, list and delete *raise*: a
/// [`DomainError`] travels inside the returned `anyhow::Error`. Create and
/// update return a [`DomainResult`]; their outer `anyhow::Error` is reserved
/// for unexpected failures only.
#[async_trait]
pub trait DeckService: Send + Sync {
    async fn list(&self, user: &AuthenticatedUser) -> anyhow::Result<Vec<Deck>>;

    async fn get_by_id(&self, user: &AuthenticatedUser, deck_id: &str) -> anyhow::Result<Deck>;

    async fn create(
        &self,
        user: &AuthenticatedUser,
        payload: DeckCreatePayload,
    ) -> anyhow::Result<DomainResult<Deck>>;

    async fn update(
        &self,
        user: &AuthenticatedUser,
        deck_id: &str,
        payload: DeckUpdatePayload,
    ) -> anyhow::Result<DomainResult<Deck>>;

    async fn delete(&self, user: &AuthenticatedUser, deck_id: &str) -> anyhow::Result<()>;
}
