use crate::error::AppError;
use crate::models::{Club, ClubUpdate, NewClub};
use crate::services::DirectoryService;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn create_club(
    State(state): State<AppState>,
    body: Result<Json<NewClub>, JsonRejection>,
) -> Result<Json<Club>, AppError> {
    let Json(input) = body?;
    let club = DirectoryService::create_club(state.directory.as_ref(), input).await?;
    Ok(Json(club))
}

pub async fn list_clubs(State(state): State<AppState>) -> Result<Json<Vec<Club>>, AppError> {
    Ok(Json(DirectoryService::list_clubs(state.directory.as_ref()).await?))
}

pub async fn get_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Club>, AppError> {
    Ok(Json(DirectoryService::get_club(state.directory.as_ref(), &id).await?))
}

pub async fn update_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ClubUpdate>, JsonRejection>,
) -> Result<Json<Club>, AppError> {
    let Json(changes) = body?;
    let club = DirectoryService::update_club(state.directory.as_ref(), &id, changes).await?;
    Ok(Json(club))
}
