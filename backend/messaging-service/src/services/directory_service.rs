use crate::error::{AppError, AppResult};
use crate::models::participant::parse_id;
use crate::models::{now_micros, Club, ClubUpdate, NewClub, NewPlayer, Player, PlayerUpdate};
use crate::repository::DirectoryRepository;
use chrono::Datelike;
use uuid::Uuid;
use validator::Validate;

const EMAIL_TAKEN: &str = "Email already registered";

pub struct DirectoryService;

impl DirectoryService {
    pub async fn create_player(
        directory: &dyn DirectoryRepository,
        input: NewPlayer,
    ) -> AppResult<Player> {
        input.validate()?;

        let player = Player {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            position: input.position,
            experience_level: input.experience_level,
            location: input.location,
            bio: input.bio,
            age: input.age,
            created_at: now_micros(),
        };
        directory.insert_player(&player).await.map_err(email_taken)?;

        tracing::info!(player_id = %player.id, "player registered");
        Ok(player)
    }

    pub async fn update_player(
        directory: &dyn DirectoryRepository,
        id: &str,
        changes: PlayerUpdate,
    ) -> AppResult<Player> {
        let mut player = Self::get_player(directory, id).await?;
        changes.validate()?;
        changes.apply_to(&mut player);
        directory.update_player(&player).await.map_err(email_taken)?;

        tracing::info!(player_id = %player.id, "player profile updated");
        Ok(player)
    }

    pub async fn list_players(directory: &dyn DirectoryRepository) -> AppResult<Vec<Player>> {
        directory.list_players().await
    }

    pub async fn get_player(directory: &dyn DirectoryRepository, id: &str) -> AppResult<Player> {
        let id = parse_id(id, "player id")?;
        directory
            .find_player(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Player not found".into()))
    }

    pub async fn create_club(
        directory: &dyn DirectoryRepository,
        input: NewClub,
    ) -> AppResult<Club> {
        input.validate()?;
        let now = now_micros();
        check_established_year(input.established_year)?;

        let club = Club {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            location: input.location,
            description: input.description,
            contact_info: input.contact_info,
            established_year: input.established_year,
            created_at: now,
        };
        directory.insert_club(&club).await.map_err(email_taken)?;

        tracing::info!(club_id = %club.id, "club registered");
        Ok(club)
    }

    pub async fn update_club(
        directory: &dyn DirectoryRepository,
        id: &str,
        changes: ClubUpdate,
    ) -> AppResult<Club> {
        let mut club = Self::get_club(directory, id).await?;
        changes.validate()?;
        check_established_year(changes.established_year)?;
        changes.apply_to(&mut club);
        directory.update_club(&club).await.map_err(email_taken)?;

        tracing::info!(club_id = %club.id, "club profile updated");
        Ok(club)
    }

    pub async fn list_clubs(directory: &dyn DirectoryRepository) -> AppResult<Vec<Club>> {
        directory.list_clubs().await
    }

    pub async fn get_club(directory: &dyn DirectoryRepository, id: &str) -> AppResult<Club> {
        let id = parse_id(id, "club id")?;
        directory
            .find_club(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Club not found".into()))
    }
}

fn check_established_year(year: Option<i32>) -> AppResult<()> {
    if year.is_some_and(|year| year > now_micros().year()) {
        return Err(AppError::BadRequest(
            "established_year cannot be in the future".into(),
        ));
    }
    Ok(())
}

fn email_taken(err: AppError) -> AppError {
    match err {
        AppError::Conflict(_) => AppError::BadRequest(EMAIL_TAKEN.into()),
        other => other,
    }
}
