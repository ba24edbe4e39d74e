use std::sync::Arc;

use crate::error::{Error, Result};
use crate::recipes::dto::{Envelope, RecipeInput, RecipeJson};
use crate::recipes::model::Recipe;
use crate::recipes::repo::RecipeStore;

/// Orchestrates one store call per use case and shapes the public envelope.
/// Store failures pass through unchanged; only `None`-where-one-expected is
/// turned into `NotFound` here.
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

fn normalize_text(mut input: RecipeInput) -> RecipeInput {
    input.title = input.title.map(|t| t.trim().to_string());
    input.description = input.description.map(|d| d.trim().to_string());
    input
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    /// Ids arrive as raw path text; anything but a positive integer is
    /// rejected before the store is touched.
    fn parse_id(raw: &str) -> Result<i64> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(Error::InvalidInput(format!("Invalid recipe id: {raw}"))),
        }
    }

    pub async fn get_all_recipes(&self) -> Result<Envelope<Vec<RecipeJson>>> {
        let recipes = self.store.find_all().await?;
        Ok(Envelope::ok(
            "Recipes retrieved successfully",
            recipes.iter().map(Recipe::to_json).collect(),
        ))
    }

    pub async fn get_recipe_by_id(&self, raw_id: &str) -> Result<Envelope<RecipeJson>> {
        let id = Self::parse_id(raw_id)?;
        let recipe = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Recipe with id {id} not found")))?;
        Ok(Envelope::ok("Recipe retrieved successfully", recipe.to_json()))
    }

    pub async fn create_recipe(&self, input: RecipeInput) -> Result<Envelope<RecipeJson>> {
        let recipe = self.store.create(normalize_text(input)).await?;
        Ok(Envelope::ok("Recipe created successfully", recipe.to_json()))
    }

    pub async fn update_recipe(
        &self,
        raw_id: &str,
        input: RecipeInput,
    ) -> Result<Envelope<RecipeJson>> {
        let id = Self::parse_id(raw_id)?;
        let recipe = self
            .store
            .update(id, normalize_text(input))
            .await?
            .ok_or_else(|| Error::NotFound(format!("Recipe with id {id} not found")))?;
        Ok(Envelope::ok("Recipe updated successfully", recipe.to_json()))
    }

    pub async fn delete_recipe(&self, raw_id: &str) -> Result<Envelope<RecipeJson>> {
        let id = Self::parse_id(raw_id)?;
        let recipe = self
            .store
            .delete(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Recipe with id {id} not found")))?;
        Ok(Envelope::ok("Recipe deleted successfully", recipe.to_json()))
    }
}
