use crate::error::AppError;
use crate::models::{NewPlayer, Player, PlayerUpdate};
use crate::services::DirectoryService;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn create_player(
    State(state): State<AppState>,
    body: Result<Json<NewPlayer>, JsonRejection>,
) -> Result<Json<Player>, AppError> {
    let Json(input) = body?;
    let player = DirectoryService::create_player(state.directory.as_ref(), input).await?;
    Ok(Json(player))
}

pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, AppError> {
    Ok(Json(DirectoryService::list_players(state.directory.as_ref()).await?))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Player>, AppError> {
    Ok(Json(DirectoryService::get_player(state.directory.as_ref(), &id).await?))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PlayerUpdate>, JsonRejection>,
) -> Result<Json<Player>, AppError> {
    let Json(changes) = body?;
    let player = DirectoryService::update_player(state.directory.as_ref(), &id, changes).await?;
    Ok(Json(player))
}
