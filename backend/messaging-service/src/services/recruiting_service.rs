use crate::error::{AppError, AppResult};
use crate::models::participant::parse_id;
use crate::models::{
    now_micros, Application, ApplicationFilter, ApplicationStatus, NewApplication, NewVacancy,
    Vacancy,
};
use crate::repository::{DirectoryRepository, RecruitingRepository};
use uuid::Uuid;
use validator::Validate;

const ALREADY_APPLIED: &str = "Already applied to this vacancy";

pub struct RecruitingService;

impl RecruitingService {
    pub async fn create_vacancy(
        directory: &dyn DirectoryRepository,
        recruiting: &dyn RecruitingRepository,
        input: NewVacancy,
    ) -> AppResult<Vacancy> {
        input.validate()?;
        let club_id = parse_id(&input.club_id, "club id")?;
        let club = directory
            .find_club(club_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Club not found".into()))?;

        let vacancy = Vacancy {
            id: Uuid::new_v4(),
            club_id: club.id,
            club_name: club.name,
            position: input.position,
            description: input.description,
            requirements: input.requirements,
            experience_level: input.experience_level,
            location: input.location,
            created_at: now_micros(),
        };
        recruiting.insert_vacancy(&vacancy).await?;

        tracing::info!(vacancy_id = %vacancy.id, club_id = %vacancy.club_id, "vacancy posted");
        Ok(vacancy)
    }

    pub async fn list_vacancies(recruiting: &dyn RecruitingRepository) -> AppResult<Vec<Vacancy>> {
        recruiting.list_vacancies(None).await
    }

    pub async fn get_vacancy(recruiting: &dyn RecruitingRepository, id: &str) -> AppResult<Vacancy> {
        let id = parse_id(id, "vacancy id")?;
        recruiting
            .find_vacancy(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vacancy not found".into()))
    }

    pub async fn club_vacancies(
        recruiting: &dyn RecruitingRepository,
        club_id: &str,
    ) -> AppResult<Vec<Vacancy>> {
        let club_id = parse_id(club_id, "club id")?;
        recruiting.list_vacancies(Some(club_id)).await
    }

    pub async fn create_application(
        directory: &dyn DirectoryRepository,
        recruiting: &dyn RecruitingRepository,
        input: NewApplication,
    ) -> AppResult<Application> {
        let player_id = parse_id(&input.player_id, "player id")?;
        let vacancy_id = parse_id(&input.vacancy_id, "vacancy id")?;

        let player = directory
            .find_player(player_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".into()))?;
        let vacancy = recruiting
            .find_vacancy(vacancy_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vacancy not found".into()))?;

        if recruiting.find_application(player_id, vacancy_id).await?.is_some() {
            return Err(AppError::BadRequest(ALREADY_APPLIED.into()));
        }

        let application = Application {
            id: Uuid::new_v4(),
            player_id: player.id,
            player_name: player.name,
            vacancy_id: vacancy.id,
            vacancy_position: vacancy.position,
            club_name: vacancy.club_name,
            status: ApplicationStatus::Pending,
            applied_at: now_micros(),
        };
        recruiting
            .insert_application(&application)
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => AppError::BadRequest(ALREADY_APPLIED.into()),
                other => other,
            })?;

        tracing::info!(
            application_id = %application.id,
            player_id = %application.player_id,
            vacancy_id = %application.vacancy_id,
            "application submitted"
        );
        Ok(application)
    }

    pub async fn list_applications(
        recruiting: &dyn RecruitingRepository,
        filter: ApplicationFilter,
    ) -> AppResult<Vec<Application>> {
        recruiting.list_applications(filter).await
    }

    pub async fn player_applications(
        recruiting: &dyn RecruitingRepository,
        player_id: &str,
    ) -> AppResult<Vec<Application>> {
        let player_id = parse_id(player_id, "player id")?;
        recruiting
            .list_applications(ApplicationFilter::Player(player_id))
            .await
    }

    pub async fn club_applications(
        recruiting: &dyn RecruitingRepository,
        club_id: &str,
    ) -> AppResult<Vec<Application>> {
        let club_id = parse_id(club_id, "club id")?;
        recruiting
            .list_applications(ApplicationFilter::Club(club_id))
            .await
    }
}
