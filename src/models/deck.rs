use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sanitized update produced by the deck update schema.
///
/// `description` is doubly optional: `None` leaves it untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckUpdatePayload {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
}

impl DeckUpdatePayload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_public.is_none()
    }

    /// Apply the changes in place, touching `updated_at` only when something changed
    pub fn apply_to(&self, deck: &mut Deck, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        if let Some(name) = &self.name {
            deck.name = name.clone();
        }
        if let Some(description) = &self.description {
            deck.description = description.clone();
        }
        if let Some(is_public) = self.is_public {
            deck.is_public = is_public;
        }
        deck.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckCreatePayload {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}
