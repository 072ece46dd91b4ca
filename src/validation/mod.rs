pub mod deck;

pub use deck::{DeckCreateSchema, DeckUpdateSchema};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-field validation messages, keyed by the payload's field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Declarative contract for an incoming JSON payload.
///
/// `safe_validate` never fails any other way than by returning the
/// collected field errors.
pub trait Schema: Send + Sync {
    type Output;

    fn safe_validate(&self, raw: &Value) -> Result<Self::Output, FieldErrors>;
}
