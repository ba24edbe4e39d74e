use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::recipes::model::SequenceField;

/// A sequence field as clients actually send it: a proper array, a
/// JSON-encoded array in a string, or something else entirely. Normalized
/// exactly once, at the boundary, before the model sees it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SequenceInput {
    Items(Vec<String>),
    JsonEncoded(String),
    Other(serde_json::Value),
}

impl SequenceInput {
    pub fn normalize(self) -> SequenceField {
        match self {
            Self::Items(items) => SequenceField::Items(items),
            Self::JsonEncoded(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(items) => SequenceField::Items(items),
                Err(_) => SequenceField::Malformed,
            },
            Self::Other(_) => SequenceField::Malformed,
        }
    }
}

/// Request body for create and update. `id` and timestamps are not part of
/// the input shape; anything a client sends for them is dropped on
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<SequenceInput>,
    pub instructions: Option<SequenceInput>,
}

/// API-facing recipe shape. Sequences are real arrays here, never the JSON
/// text the storage column holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeJson {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Success envelope returned by every service operation.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
