use super::directory::{not_blank, ExperienceLevel};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: Uuid,
    pub club_id: Uuid,
    /// Copied from the club when the vacancy is posted
    pub club_name: String,
    pub position: String,
    pub description: String,
    pub requirements: Option<String>,
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewVacancy {
    pub club_id: String,
    #[validate(custom(function = "not_blank"), length(max = 100))]
    pub position: String,
    #[validate(custom(function = "not_blank"), length(max = 5000))]
    pub description: String,
    #[validate(length(max = 2000))]
    pub requirements: Option<String>,
    pub experience_level: ExperienceLevel,
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(AppError::BadRequest(format!("Invalid application status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub player_id: Uuid,
    pub player_name: String,
    pub vacancy_id: Uuid,
    pub vacancy_position: String,
    pub club_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub player_id: String,
    pub vacancy_id: String,
}

/// Which applications to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationFilter {
    All,
    Player(Uuid),
    /// Applications to any vacancy posted by the club
    Club(Uuid),
}
