pub mod deck_service;
pub mod memory_deck_service;

pub use deck_service::{DeckService, DomainError, DomainResult};
pub use memory_deck_service::InMemoryDeckService;
