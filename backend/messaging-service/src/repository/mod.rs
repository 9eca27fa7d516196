//! Storage seams.
//!
//! Services talk to these traits; [`PgStore`] backs them with PostgreSQL and
//! [`InMemoryStore`] with a single mutex-guarded map for local runs and tests.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

use crate::error::AppResult;
use crate::models::{
    Application, ApplicationFilter, Club, Conversation, ConversationAccess, MarkReadOutcome,
    Message, NewMessage, PageRequest, ParticipantRef, ParticipantType, Player, Vacancy,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

#[async_trait]
pub trait MessagingRepository: Send + Sync {
    /// Store a message and upsert its pair's conversation in one atomic step.
    ///
    /// The stored `created_at` is `sent_at`, bumped past the conversation's
    /// previous `last_message_at` when the clock has not advanced, so message
    /// timestamps are strictly increasing per conversation and equal to the
    /// conversation's `last_message_at`. Both hide flags are cleared.
    ///
    /// A draft whose id is already stored resolves to the stored message and
    /// its conversation without writing again.
    async fn append_message(
        &self,
        draft: &NewMessage,
        sent_at: DateTime<Utc>,
    ) -> AppResult<(Message, Conversation)>;

    async fn find_message(&self, id: Uuid) -> AppResult<Option<Message>>;

    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>>;

    /// Conversations visible to `viewer`, newest activity first, each with the
    /// viewer's unread count.
    async fn list_conversations(&self, viewer: ParticipantRef)
        -> AppResult<Vec<(Conversation, i64)>>;

    /// One page of a conversation, returned in ascending `created_at` order.
    async fn list_messages(&self, conversation_id: Uuid, page: PageRequest)
        -> AppResult<Vec<Message>>;

    /// Set `read_at` on messages addressed to `viewer` created at or before
    /// `snapshot`.
    async fn mark_read(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
        snapshot: DateTime<Utc>,
    ) -> AppResult<MarkReadOutcome>;

    async fn hide_for(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
    ) -> AppResult<ConversationAccess>;

    /// Unread messages addressed to `viewer` across conversations not hidden by them.
    async fn unread_total(&self, viewer: ParticipantRef) -> AppResult<i64>;
}

#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn insert_player(&self, player: &Player) -> AppResult<()>;
    /// Overwrite a stored player's profile. Fails with `AppError::Conflict`
    /// when the email belongs to another player and `AppError::NotFound` when
    /// the player does not exist.
    async fn update_player(&self, player: &Player) -> AppResult<()>;
    async fn list_players(&self) -> AppResult<Vec<Player>>;
    async fn find_player(&self, id: Uuid) -> AppResult<Option<Player>>;

    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn insert_club(&self, club: &Club) -> AppResult<()>;
    /// Same contract as [`DirectoryRepository::update_player`].
    async fn update_club(&self, club: &Club) -> AppResult<()>;
    async fn list_clubs(&self) -> AppResult<Vec<Club>>;
    async fn find_club(&self, id: Uuid) -> AppResult<Option<Club>>;

    /// Display names for the given participants; unknown ones are absent.
    async fn display_names(
        &self,
        participants: &[ParticipantRef],
    ) -> AppResult<HashMap<ParticipantRef, String>>;

    async fn exists(&self, who: ParticipantRef) -> AppResult<bool> {
        Ok(match who.kind {
            ParticipantType::Player => self.find_player(who.id).await?.is_some(),
            ParticipantType::Club => self.find_club(who.id).await?.is_some(),
        })
    }
}

#[async_trait]
pub trait RecruitingRepository: Send + Sync {
    async fn insert_vacancy(&self, vacancy: &Vacancy) -> AppResult<()>;
    /// Newest first; restricted to one club when `club_id` is given.
    async fn list_vacancies(&self, club_id: Option<Uuid>) -> AppResult<Vec<Vacancy>>;
    async fn find_vacancy(&self, id: Uuid) -> AppResult<Option<Vacancy>>;

    /// Fails with `AppError::Conflict` when the player already applied.
    async fn insert_application(&self, application: &Application) -> AppResult<()>;
    async fn find_application(&self, player_id: Uuid, vacancy_id: Uuid)
        -> AppResult<Option<Application>>;
    /// Newest first.
    async fn list_applications(&self, filter: ApplicationFilter) -> AppResult<Vec<Application>>;
}
