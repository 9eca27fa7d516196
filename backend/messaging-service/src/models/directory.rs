use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(alias = "beginner")]
    Beginner,
    #[serde(alias = "intermediate")]
    Intermediate,
    #[serde(alias = "advanced")]
    Advanced,
    #[serde(alias = "professional")]
    Professional,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
            ExperienceLevel::Professional => "Professional",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "professional" => Ok(Self::Professional),
            other => Err(AppError::BadRequest(format!("Invalid experience level: {other}"))),
        }
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub position: String,
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub bio: Option<String>,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPlayer {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub position: String,
    pub experience_level: ExperienceLevel,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub location: String,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(range(min = 5, max = 100))]
    pub age: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub location: String,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub established_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewClub {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub location: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub contact_info: Option<String>,
    #[validate(range(min = 1800))]
    pub established_year: Option<i32>,
}

/// Partial profile edit. Absent fields keep their stored value; fields the
/// profile does not model are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PlayerUpdate {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub position: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(range(min = 5, max = 100))]
    pub age: Option<i32>,
}

impl PlayerUpdate {
    pub fn apply_to(self, player: &mut Player) {
        if let Some(name) = self.name {
            player.name = name;
        }
        if let Some(email) = self.email {
            player.email = email;
        }
        if let Some(position) = self.position {
            player.position = position;
        }
        if let Some(level) = self.experience_level {
            player.experience_level = level;
        }
        if let Some(location) = self.location {
            player.location = location;
        }
        if self.bio.is_some() {
            player.bio = self.bio;
        }
        if self.age.is_some() {
            player.age = self.age;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ClubUpdate {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub contact_info: Option<String>,
    #[validate(range(min = 1800))]
    pub established_year: Option<i32>,
}

impl ClubUpdate {
    pub fn apply_to(self, club: &mut Club) {
        if let Some(name) = self.name {
            club.name = name;
        }
        if let Some(email) = self.email {
            club.email = email;
        }
        if let Some(location) = self.location {
            club.location = location;
        }
        if self.description.is_some() {
            club.description = self.description;
        }
        if self.contact_info.is_some() {
            club.contact_info = self.contact_info;
        }
        if self.established_year.is_some() {
            club.established_year = self.established_year;
        }
    }
}
