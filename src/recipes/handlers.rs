use axum::{
    extract::{OriginalUri, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::error::HttpError;
use crate::recipes::dto::{Envelope, RecipeInput, RecipeJson};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/:id", put(update_recipe).delete(delete_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Envelope<Vec<RecipeJson>>>, HttpError> {
    state
        .recipes
        .get_all_recipes()
        .await
        .map(Json)
        .map_err(|e| HttpError::new(e, uri.path()))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Json<Envelope<RecipeJson>>, HttpError> {
    state
        .recipes
        .get_recipe_by_id(&id)
        .await
        .map(Json)
        .map_err(|e| HttpError::new(e, uri.path()))
}

#[instrument(skip(state, input))]
pub async fn create_recipe(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<RecipeInput>,
) -> Result<Json<Envelope<RecipeJson>>, HttpError> {
    state
        .recipes
        .create_recipe(input)
        .await
        .map(Json)
        .map_err(|e| HttpError::new(e, uri.path()))
}

#[instrument(skip(state, input))]
pub async fn update_recipe(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> Result<Json<Envelope<RecipeJson>>, HttpError> {
    state
        .recipes
        .update_recipe(&id, input)
        .await
        .map(Json)
        .map_err(|e| HttpError::new(e, uri.path()))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Result<Json<Envelope<RecipeJson>>, HttpError> {
    state
        .recipes
        .delete_recipe(&id)
        .await
        .map(Json)
        .map_err(|e| HttpError::new(e, uri.path()))
}
