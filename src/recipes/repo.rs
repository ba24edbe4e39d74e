use async_trait::async_trait;
use sqlx::{FromRow, MySqlPool};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::recipes::dto::RecipeInput;
use crate::recipes::model::{Recipe, SequenceField};

/// CRUD contract the service depends on. Implemented by [`MySqlRecipeRepo`]
/// in production and by a counting fake in tests.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes, most recently created first.
    async fn find_all(&self) -> Result<Vec<Recipe>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>>;
    /// Validates, inserts, then re-fetches so storage-assigned fields come
    /// back filled in.
    async fn create(&self, input: RecipeInput) -> Result<Recipe>;
    /// `None` when no row matched the id.
    async fn update(&self, id: i64, input: RecipeInput) -> Result<Option<Recipe>>;
    /// Returns the deleted recipe's prior data, `None` when no row matched.
    async fn delete(&self, id: i64) -> Result<Option<Recipe>>;
}

/// Raw row shape of the `recipes` table. Never leaves this module; every
/// public method speaks in [`Recipe`].
#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    title: String,
    description: Option<String>,
    ingredients: String,
    instructions: String,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

fn parse_sequence_column(raw: &str, column: &str, id: i64) -> Result<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| {
        Error::Storage(anyhow::anyhow!(
            "corrupt {column} column on recipe {id}: {e}"
        ))
    })
}

fn encode_sequence(items: &[String]) -> Result<String> {
    serde_json::to_string(items)
        .map_err(|e| Error::Storage(anyhow::anyhow!("encode sequence column: {e}")))
}

fn recipe_from_row(row: RecipeRow) -> Result<Recipe> {
    let ingredients = parse_sequence_column(&row.ingredients, "ingredients", row.id)?;
    let instructions = parse_sequence_column(&row.instructions, "instructions", row.id)?;
    Ok(Recipe {
        id: Some(row.id),
        title: row.title,
        description: row.description,
        ingredients: SequenceField::Items(ingredients),
        instructions: SequenceField::Items(instructions),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Builds a transient model from the input and runs structural validation.
/// Write paths call this before touching the database.
pub(crate) fn validate_with_model(input: RecipeInput) -> Result<Recipe> {
    let recipe = Recipe::from_input(input);
    let errors = recipe.validate();
    if errors.is_empty() {
        Ok(recipe)
    } else {
        Err(Error::Validation(errors.join(", ")))
    }
}

pub struct MySqlRecipeRepo {
    pool: MySqlPool,
}

impl MySqlRecipeRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, title, description, ingredients, instructions, created_at, updated_at FROM recipes";

#[async_trait]
impl RecipeStore for MySqlRecipeRepo {
    async fn find_all(&self) -> Result<Vec<Recipe>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, RecipeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(recipe_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row = sqlx::query_as::<_, RecipeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(recipe_from_row).transpose()
    }

    async fn create(&self, input: RecipeInput) -> Result<Recipe> {
        let recipe = validate_with_model(input)?;
        let record = recipe.to_database();
        let result = sqlx::query(
            "INSERT INTO recipes (title, description, ingredients, instructions) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.title)
        .bind(&record.description)
        .bind(encode_sequence(&record.ingredients)?)
        .bind(encode_sequence(&record.instructions)?)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id).await?.ok_or_else(|| {
            Error::Storage(anyhow::anyhow!("recipe {id} missing immediately after insert"))
        })
    }

    async fn update(&self, id: i64, input: RecipeInput) -> Result<Option<Recipe>> {
        let recipe = validate_with_model(input)?;
        let record = recipe.to_database();
        let result = sqlx::query(
            "UPDATE recipes SET title = ?, description = ?, ingredients = ?, \
             instructions = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(&record.title)
        .bind(&record.description)
        .bind(encode_sequence(&record.ingredients)?)
        .bind(encode_sequence(&record.instructions)?)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<Option<Recipe>> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(Some(existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::dto::SequenceInput;

    fn row(id: i64, ingredients: &str, instructions: &str) -> RecipeRow {
        RecipeRow {
            id,
            title: "Gado Gado".into(),
            description: None,
            ingredients: ingredients.into(),
            instructions: instructions.into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn row_mapping_decodes_sequence_columns() {
        let recipe = recipe_from_row(row(3, r#"["tahu","lontong"]"#, r#"["campur"]"#)).unwrap();
        assert_eq!(recipe.id, Some(3));
        assert_eq!(
            recipe.ingredients,
            SequenceField::Items(vec!["tahu".into(), "lontong".into()])
        );
        assert_eq!(recipe.instructions, SequenceField::Items(vec!["campur".into()]));
    }

    #[test]
    fn corrupt_sequence_column_is_a_storage_error() {
        let err = recipe_from_row(row(7, "not json at all", r#"["ok"]"#)).unwrap_err();
        assert_eq!(err.kind(), "storage_error");
        match err {
            Error::Storage(source) => {
                let msg = source.to_string();
                assert!(msg.contains("ingredients"));
                assert!(msg.contains('7'));
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn sequences_are_encoded_as_json_arrays() {
        let encoded = encode_sequence(&["rebus".to_string(), "sajikan".to_string()]).unwrap();
        assert_eq!(encoded, r#"["rebus","sajikan"]"#);
        assert_eq!(encode_sequence(&[]).unwrap(), "[]");
    }

    #[test]
    fn validate_with_model_joins_all_messages() {
        let err = validate_with_model(RecipeInput::default()).unwrap_err();
        match err {
            Error::Validation(msg) => assert_eq!(
                msg,
                "title is required, ingredients is required, instructions is required"
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_with_model_accepts_valid_input() {
        let input = RecipeInput {
            title: Some("Sate Padang".into()),
            description: None,
            ingredients: Some(SequenceInput::Items(vec!["daging".into()])),
            instructions: Some(SequenceInput::Items(vec!["bakar".into()])),
        };
        let recipe = validate_with_model(input).unwrap();
        assert_eq!(recipe.title, "Sate Padang");
    }
}
