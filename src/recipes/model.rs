use time::OffsetDateTime;

use crate::recipes::dto::{RecipeInput, RecipeJson};

/// A sequence field after boundary normalization. Client input that was
/// neither an array of strings nor a JSON-encoded array of strings lands in
/// `Malformed`, so `validate()` can report it instead of a layer above
/// sniffing types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceField {
    Items(Vec<String>),
    Malformed,
}

impl SequenceField {
    /// The contained items, with `Malformed` coerced to an empty sequence.
    pub fn coerced(&self) -> Vec<String> {
        match self {
            Self::Items(items) => items.clone(),
            Self::Malformed => Vec::new(),
        }
    }
}

impl Default for SequenceField {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

/// Canonical in-memory shape of a recipe. `id` and the timestamps are
/// storage-assigned and stay `None` until a row round-trip fills them in.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: SequenceField,
    pub instructions: SequenceField,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

/// Storage-facing projection of a [`Recipe`]. Sequences stay sequences here;
/// the repository alone turns them into JSON text at the point of writing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

impl Recipe {
    /// Builds a recipe from client input. Missing fields get defaults; this
    /// never fails and never validates. Any client-supplied id or timestamps
    /// are ignored by construction.
    pub fn from_input(input: RecipeInput) -> Self {
        Self {
            id: None,
            title: input.title.unwrap_or_default(),
            description: input.description,
            ingredients: input
                .ingredients
                .map(|s| s.normalize())
                .unwrap_or_default(),
            instructions: input
                .instructions
                .map(|s| s.normalize())
                .unwrap_or_default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Structural validation. Pure; reports every violation, in field
    /// declaration order.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title is required".to_string());
        } else if title.chars().count() < 3 {
            errors.push("Title must be at least 3 characters".to_string());
        }

        match &self.ingredients {
            SequenceField::Items(items) if items.is_empty() => {
                errors.push("ingredients is required".to_string());
            }
            SequenceField::Malformed => {
                errors.push("Ingredients must be an array".to_string());
            }
            SequenceField::Items(_) => {}
        }

        match &self.instructions {
            SequenceField::Items(items) if items.is_empty() => {
                errors.push("instructions is required".to_string());
            }
            SequenceField::Malformed => {
                errors.push("Instructions must be an array".to_string());
            }
            SequenceField::Items(_) => {}
        }

        errors
    }

    /// API-facing projection.
    pub fn to_json(&self) -> RecipeJson {
        RecipeJson {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            ingredients: self.ingredients.coerced(),
            instructions: self.instructions.coerced(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Storage-facing projection: title and description trimmed, malformed
    /// sequences coerced to empty, timestamps passed through. Idempotent.
    pub fn to_database(&self) -> RecipeRecord {
        RecipeRecord {
            title: self.title.trim().to_string(),
            description: self.description.as_deref().map(|d| d.trim().to_string()),
            ingredients: self.ingredients.coerced(),
            instructions: self.instructions.coerced(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::dto::SequenceInput;

    fn valid_input() -> RecipeInput {
        RecipeInput {
            title: Some("Soto Ayam".into()),
            description: Some("Chicken soup".into()),
            ingredients: Some(SequenceInput::Items(vec!["ayam".into(), "kentang".into()])),
            instructions: Some(SequenceInput::Items(vec!["rebus".into(), "sajikan".into()])),
        }
    }

    #[test]
    fn construction_defaults_never_fail() {
        let recipe = Recipe::from_input(RecipeInput::default());
        assert_eq!(recipe.id, None);
        assert_eq!(recipe.title, "");
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.ingredients, SequenceField::Items(vec![]));
        assert_eq!(recipe.instructions, SequenceField::Items(vec![]));
        assert_eq!(recipe.created_at, None);
        assert_eq!(recipe.updated_at, None);
    }

    #[test]
    fn validate_reports_all_missing_fields() {
        let errors = Recipe::from_input(RecipeInput::default()).validate();
        assert_eq!(
            errors,
            vec![
                "title is required".to_string(),
                "ingredients is required".to_string(),
                "instructions is required".to_string(),
            ]
        );
    }

    #[test]
    fn valid_recipe_has_no_errors() {
        assert!(Recipe::from_input(valid_input()).validate().is_empty());
    }

    #[test]
    fn title_shorter_than_three_chars_is_rejected() {
        let mut input = valid_input();
        input.title = Some("ab".into());
        let errors = Recipe::from_input(input).validate();
        assert_eq!(errors, vec!["Title must be at least 3 characters"]);
    }

    #[test]
    fn title_of_exactly_three_chars_passes() {
        let mut input = valid_input();
        input.title = Some("pho".into());
        assert!(Recipe::from_input(input).validate().is_empty());
    }

    #[test]
    fn whitespace_only_title_is_required_not_short() {
        let mut input = valid_input();
        input.title = Some("   ".into());
        let errors = Recipe::from_input(input).validate();
        assert_eq!(errors, vec!["title is required"]);
    }

    #[test]
    fn malformed_sequences_report_must_be_an_array() {
        let mut input = valid_input();
        input.ingredients = Some(SequenceInput::Other(serde_json::json!(42)));
        input.instructions = Some(SequenceInput::Other(serde_json::json!({"step": 1})));
        let errors = Recipe::from_input(input).validate();
        assert_eq!(
            errors,
            vec!["Ingredients must be an array", "Instructions must be an array"]
        );
    }

    #[test]
    fn to_database_trims_and_coerces() {
        let recipe = Recipe {
            id: None,
            title: "  Nasi Goreng  ".into(),
            description: Some("  fried rice  ".into()),
            ingredients: SequenceField::Malformed,
            instructions: SequenceField::Items(vec!["goreng".into()]),
            created_at: None,
            updated_at: None,
        };
        let record = recipe.to_database();
        assert_eq!(record.title, "Nasi Goreng");
        assert_eq!(record.description.as_deref(), Some("fried rice"));
        assert_eq!(record.ingredients, Vec::<String>::new());
        assert_eq!(record.instructions, vec!["goreng".to_string()]);
        // idempotent
        assert_eq!(recipe.to_database(), record);
    }

    #[test]
    fn persistence_projection_round_trips() {
        let original = Recipe::from_input(valid_input());
        let record = original.to_database();
        let rebuilt = Recipe {
            id: original.id,
            title: record.title,
            description: record.description,
            ingredients: SequenceField::Items(record.ingredients),
            instructions: SequenceField::Items(record.instructions),
            created_at: original.created_at,
            updated_at: original.updated_at,
        };
        assert_eq!(rebuilt.to_json(), original.to_json());
    }
}
