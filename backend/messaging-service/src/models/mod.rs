pub mod conversation;
pub mod directory;
pub mod message;
pub mod participant;
pub mod recruiting;

use chrono::{DateTime, Timelike, Utc};

pub use conversation::{
    Conversation, ConversationAccess, ConversationSummary, ConversationView, MarkReadOutcome,
};
pub use directory::{
    Club, ClubUpdate, ExperienceLevel, NewClub, NewPlayer, Player, PlayerUpdate,
};
pub use message::{Message, NewMessage, PageRequest, SendMessageRequest};
pub use participant::{ParticipantRef, ParticipantType};
pub use recruiting::{Application, ApplicationFilter, ApplicationStatus, NewApplication, NewVacancy, Vacancy};

/// Current time truncated to microseconds, the resolution PostgreSQL stores.
pub fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000)
        .unwrap_or(now)
}
