pub mod deck;

pub use deck::{Deck, DeckCreatePayload, DeckUpdatePayload};
