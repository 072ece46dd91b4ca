use serde_json::{Map, Value};

use super::{FieldErrors, Schema};
use crate::config::ValidationConfig;
use crate::models::{DeckCreatePayload, DeckUpdatePayload};

const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const IS_PUBLIC: &str = "isPublic";

/// Rules for `PUT /api/decks/:deckId`. Every field is optional.
#[derive(Debug, Clone)]
pub struct DeckUpdateSchema {
    name_max_length: usize,
    description_max_length: usize,
}

impl DeckUpdateSchema {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            name_max_length: config.deck_name_max_length,
            description_max_length: config.deck_description_max_length,
        }
    }
}

impl Schema for DeckUpdateSchema {
    type Output = DeckUpdatePayload;

    fn safe_validate(&self, raw: &Value) -> Result<DeckUpdatePayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let object = require_object(raw, &mut errors)?;

        let payload = DeckUpdatePayload {
            name: object
                .get(NAME)
                .and_then(|v| name_field(v, self.name_max_length, &mut errors)),
            description: object
                .get(DESCRIPTION)
                .and_then(|v| description_field(v, self.description_max_length, &mut errors)),
            is_public: object.get(IS_PUBLIC).and_then(|v| bool_field(IS_PUBLIC, v, &mut errors)),
        };

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }
}

/// Rules for `POST /api/decks`. `name` is required.
#[derive(Debug, Clone)]
pub struct DeckCreateSchema {
    name_max_length: usize,
    description_max_length: usize,
}

impl DeckCreateSchema {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            name_max_length: config.deck_name_max_length,
            description_max_length: config.deck_description_max_length,
        }
    }
}

impl Schema for DeckCreateSchema {
    type Output = DeckCreatePayload;

    fn safe_validate(&self, raw: &Value) -> Result<DeckCreatePayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let object = require_object(raw, &mut errors)?;

        let name = match object.get(NAME) {
            Some(v) => name_field(v, self.name_max_length, &mut errors),
            None => {
                errors.add(NAME, "Required");
                None
            }
        };
        let description = object
            .get(DESCRIPTION)
            .and_then(|v| description_field(v, self.description_max_length, &mut errors))
            .flatten();
        let is_public = object
            .get(IS_PUBLIC)
            .and_then(|v| bool_field(IS_PUBLIC, v, &mut errors))
            .unwrap_or(false);

        match name {
            Some(name) if errors.is_empty() => Ok(DeckCreatePayload {
                name,
                description,
                is_public,
            }),
            _ => Err(errors),
        }
    }
}

fn require_object<'a>(raw: &'a Value, errors: &mut FieldErrors) -> Result<&'a Map<String, Value>, FieldErrors> {
    match raw.as_object() {
        Some(object) => Ok(object),
        None => {
            errors.add("body", format!("Expected object, received {}", type_name(raw)));
            Err(std::mem::take(errors))
        }
    }
}

fn name_field(value: &Value, max: usize, errors: &mut FieldErrors) -> Option<String> {
    let Some(s) = value.as_str() else {
        errors.add(NAME, format!("Expected string, received {}", type_name(value)));
        return None;
    };

    let trimmed = s.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        errors.add(NAME, "Deck name cannot be empty");
        None
    } else if len > max {
        errors.add(NAME, format!("Deck name must be at most {} characters", max));
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `Some(None)` means an explicit `null`
fn description_field(value: &Value, max: usize, errors: &mut FieldErrors) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) if s.chars().count() > max => {
            errors.add(
                DESCRIPTION,
                format!("Description must be at most {} characters", max),
            );
            None
        }
        Value::String(s) => Some(Some(s.clone())),
        other => {
            errors.add(
                DESCRIPTION,
                format!("Expected string or null, received {}", type_name(other)),
            );
            None
        }
    }
}

fn bool_field(field: &str, value: &Value, errors: &mut FieldErrors) -> Option<bool> {
    match value.as_bool() {
        Some(b) => Some(b),
        None => {
            errors.add(field, format!("Expected boolean, received {}", type_name(value)));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
