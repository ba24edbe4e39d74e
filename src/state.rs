use std::sync::Arc;

use anyhow::Context;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::config::AppConfig;
use crate::recipes::repo::{MySqlRecipeRepo, RecipeStore};
use crate::recipes::services::RecipeService;

#[derive(Clone)]
pub struct AppState {
    pub db: MySqlPool,
    pub config: Arc<AppConfig>,
    pub recipes: Arc<RecipeService>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let store = Arc::new(MySqlRecipeRepo::new(db.clone())) as Arc<dyn RecipeStore>;
        let recipes = Arc::new(RecipeService::new(store));

        Ok(Self {
            db,
            config,
            recipes,
        })
    }

    /// Explicit wiring for tests: any `RecipeStore` can stand in for the
    /// real repository.
    pub fn from_parts(
        db: MySqlPool,
        config: Arc<AppConfig>,
        store: Arc<dyn RecipeStore>,
    ) -> Self {
        Self {
            db,
            config,
            recipes: Arc::new(RecipeService::new(store)),
        }
    }
}
