use crate::error::AppError;
use crate::models::{Application, ApplicationFilter, NewApplication};
use crate::services::RecruitingService;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn create_application(
    State(state): State<AppState>,
    body: Result<Json<NewApplication>, JsonRejection>,
) -> Result<Json<Application>, AppError> {
    let Json(input) = body?;
    let application = RecruitingService::create_application(
        state.directory.as_ref(),
        state.recruiting.as_ref(),
        input,
    )
    .await?;
    Ok(Json(application))
}

pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(
        RecruitingService::list_applications(state.recruiting.as_ref(), ApplicationFilter::All)
            .await?,
    ))
}

/// GET /api/players/:id/applications
pub async fn player_applications(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(
        RecruitingService::player_applications(state.recruiting.as_ref(), &player_id).await?,
    ))
}

/// GET /api/clubs/:id/applications
pub async fn club_applications(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(
        RecruitingService::club_applications(state.recruiting.as_ref(), &club_id).await?,
    ))
}
