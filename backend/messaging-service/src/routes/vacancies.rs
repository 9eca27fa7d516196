use crate::error::AppError;
use crate::models::{NewVacancy, Vacancy};
use crate::services::RecruitingService;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn create_vacancy(
    State(state): State<AppState>,
    body: Result<Json<NewVacancy>, JsonRejection>,
) -> Result<Json<Vacancy>, AppError> {
    let Json(input) = body?;
    let vacancy = RecruitingService::create_vacancy(
        state.directory.as_ref(),
        state.recruiting.as_ref(),
        input,
    )
    .await?;
    Ok(Json(vacancy))
}

pub async fn list_vacancies(State(state): State<AppState>) -> Result<Json<Vec<Vacancy>>, AppError> {
    Ok(Json(RecruitingService::list_vacancies(state.recruiting.as_ref()).await?))
}

pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vacancy>, AppError> {
    Ok(Json(RecruitingService::get_vacancy(state.recruiting.as_ref(), &id).await?))
}

/// GET /api/clubs/:id/vacancies
pub async fn club_vacancies(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
) -> Result<Json<Vec<Vacancy>>, AppError> {
    Ok(Json(
        RecruitingService::club_vacancies(state.recruiting.as_ref(), &club_id).await?,
    ))
}
