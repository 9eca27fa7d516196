use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The two kinds of marketplace participant.
///
/// Variant order matters: it matches the text ordering ('club' < 'player')
/// used by the normalized-pair check constraint in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    Club,
    Player,
}

impl ParticipantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Club => "club",
            ParticipantType::Player => "player",
        }
    }

    /// Label used in not-found messages, e.g. "Player not found".
    pub fn label(&self) -> &'static str {
        match self {
            ParticipantType::Club => "Club",
            ParticipantType::Player => "Player",
        }
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticipantType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(ParticipantType::Player),
            "club" => Ok(ParticipantType::Club),
            other => Err(AppError::BadRequest(format!(
                "Invalid participant type '{other}', expected 'player' or 'club'"
            ))),
        }
    }
}

/// An identifier together with its participant type.
///
/// Field order gives the derived total order used to normalize pairs:
/// type first, then id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantRef {
    pub kind: ParticipantType,
    pub id: Uuid,
}

impl ParticipantRef {
    pub fn new(id: Uuid, kind: ParticipantType) -> Self {
        Self { kind, id }
    }

    pub fn player(id: Uuid) -> Self {
        Self::new(id, ParticipantType::Player)
    }

    pub fn club(id: Uuid) -> Self {
        Self::new(id, ParticipantType::Club)
    }

    /// Parse an id/type pair as received in paths, query strings and bodies.
    pub fn parse(id: &str, kind: &str) -> AppResult<Self> {
        Ok(Self::new(parse_id(id, "participant id")?, kind.parse()?))
    }
}

impl fmt::Display for ParticipantRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Order two participants so that `(a, b)` and `(b, a)` give the same pair.
pub fn normalize_pair(a: ParticipantRef, b: ParticipantRef) -> (ParticipantRef, ParticipantRef) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Parse a UUID, reporting malformed input as a validation error.
pub fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid {what}: {raw}")))
}
