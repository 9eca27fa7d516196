use super::{DirectoryRepository, MessagingRepository, RecruitingRepository};
use crate::error::{AppError, AppResult};
use crate::models::participant::normalize_pair;
use crate::models::{
    Application, ApplicationFilter, ApplicationStatus, Club, Conversation, ConversationAccess,
    ExperienceLevel, MarkReadOutcome, Message, NewMessage, PageRequest, ParticipantRef,
    ParticipantType, Player, Vacancy,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use resilience::{with_retry_if, RetryConfig, RetryError};
use sqlx::PgPool;
use std::collections::HashMap;
use std::future::Future;
use uuid::Uuid;

const CONVERSATION_COLUMNS: &str = "id, participant_1_id, participant_1_type, participant_2_id, \
    participant_2_type, last_message_at, last_message_content, participant_1_hidden, \
    participant_2_hidden, created_at";

const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, sender_type, receiver_id, \
    receiver_type, subject, content, reply_to_message_id, created_at, read_at";

const PLAYER_COLUMNS: &str =
    "id, name, email, position, experience_level, location, bio, age, created_at";

const CLUB_COLUMNS: &str =
    "id, name, email, location, description, contact_info, established_year, created_at";

const VACANCY_COLUMNS: &str = "id, club_id, club_name, position, description, requirements, \
    experience_level, location, created_at";

const APPLICATION_COLUMNS: &str =
    "id, player_id, player_name, vacancy_id, vacancy_position, club_name, status, applied_at";

/// PostgreSQL-backed store. Transient failures (pool timeout, dropped
/// connection) are retried once before surfacing.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    retry: RetryConfig,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry: RetryConfig::once(),
        }
    }

    async fn retrying<T, F, Fut>(&self, operation: &'static str, f: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        with_retry_if(self.retry.clone(), AppError::is_retryable, f)
            .await
            .map_err(|e| {
                if let RetryError::MaxRetriesExceeded(_, ref err) = e {
                    tracing::error!(operation, error = %err, "database still failing after retry");
                }
                e.into_inner()
            })
    }

    async fn append_message_once(
        &self,
        draft: &NewMessage,
        sent_at: DateTime<Utc>,
    ) -> AppResult<(Message, Conversation)> {
        let (first, second) = normalize_pair(draft.sender, draft.receiver);
        let mut tx = self.pool.begin().await?;

        // Row lock on the pair's conversation serializes concurrent sends;
        // a racing first insert lands on the winner's row.
        let conversation: Conversation = sqlx::query_as::<_, ConversationRecord>(&format!(
            r#"
            INSERT INTO conversations (
                id, participant_1_id, participant_1_type, participant_2_id, participant_2_type,
                last_message_at, last_message_content, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $6)
            ON CONFLICT ON CONSTRAINT conversations_pair_key DO UPDATE SET
                last_message_at = GREATEST(
                    EXCLUDED.last_message_at,
                    conversations.last_message_at + INTERVAL '1 microsecond'
                ),
                last_message_content = EXCLUDED.last_message_content,
                participant_1_hidden = FALSE,
                participant_2_hidden = FALSE
            RETURNING {CONVERSATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(first.id)
        .bind(first.kind.as_str())
        .bind(second.id)
        .bind(second.kind.as_str())
        .bind(sent_at)
        .bind(&draft.content)
        .fetch_one(&mut *tx)
        .await?
        .try_into()?;

        let message: Message = sqlx::query_as::<_, MessageRecord>(&format!(
            r#"
            INSERT INTO messages (
                id, conversation_id, sender_id, sender_type, receiver_id, receiver_type,
                subject, content, reply_to_message_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(draft.id)
        .bind(conversation.id)
        .bind(draft.sender.id)
        .bind(draft.sender.kind.as_str())
        .bind(draft.receiver.id)
        .bind(draft.receiver.kind.as_str())
        .bind(&draft.subject)
        .bind(&draft.content)
        .bind(draft.reply_to_message_id)
        .bind(conversation.last_message_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique(e, "messages.id"))?
        .try_into()?;

        tx.commit().await?;
        Ok((message, conversation))
    }

    async fn already_appended(&self, message_id: Uuid) -> AppResult<(Message, Conversation)> {
        let Some(message) = self.find_message(message_id).await? else {
            tracing::error!(%message_id, "message id conflict without a stored message");
            return Err(AppError::Internal);
        };
        let conversation = self
            .retrying("find_conversation", || {
                self.fetch_conversation(message.conversation_id)
            })
            .await?
            .ok_or(AppError::Internal)?;
        tracing::info!(%message_id, "send already stored, returning existing message");
        Ok((message, conversation))
    }

    async fn fetch_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, ConversationRecord>(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Conversation::try_from)
        .transpose()
    }

    async fn mark_read_once(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
        snapshot: DateTime<Utc>,
    ) -> AppResult<MarkReadOutcome> {
        let Some(conversation) = self.fetch_conversation(conversation_id).await? else {
            return Ok(MarkReadOutcome::Missing);
        };
        if !conversation.has_participant(viewer) {
            return Ok(MarkReadOutcome::NotParticipant);
        }

        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read_at = $4
            WHERE conversation_id = $1
              AND receiver_type = $2
              AND receiver_id = $3
              AND read_at IS NULL
              AND created_at <= $4
            "#,
        )
        .bind(conversation_id)
        .bind(viewer.kind.as_str())
        .bind(viewer.id)
        .bind(snapshot)
        .execute(&self.pool)
        .await?;

        Ok(MarkReadOutcome::Marked(result.rows_affected()))
    }

    async fn hide_once(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
    ) -> AppResult<ConversationAccess> {
        let Some(conversation) = self.fetch_conversation(conversation_id).await? else {
            return Ok(ConversationAccess::Missing);
        };
        let sql = if conversation.participant_1 == viewer {
            "UPDATE conversations SET participant_1_hidden = TRUE WHERE id = $1"
        } else if conversation.participant_2 == viewer {
            "UPDATE conversations SET participant_2_hidden = TRUE WHERE id = $1"
        } else {
            return Ok(ConversationAccess::NotParticipant);
        };
        sqlx::query(sql).bind(conversation_id).execute(&self.pool).await?;
        Ok(ConversationAccess::Granted)
    }

    async fn display_names_once(
        &self,
        participants: &[ParticipantRef],
    ) -> AppResult<HashMap<ParticipantRef, String>> {
        let ids_of = |kind: ParticipantType| -> Vec<Uuid> {
            participants.iter().filter(|p| p.kind == kind).map(|p| p.id).collect()
        };
        let player_ids = ids_of(ParticipantType::Player);
        let club_ids = ids_of(ParticipantType::Club);

        let mut names = HashMap::with_capacity(participants.len());
        if !player_ids.is_empty() {
            let rows: Vec<(Uuid, String)> =
                sqlx::query_as("SELECT id, name FROM players WHERE id = ANY($1)")
                    .bind(&player_ids)
                    .fetch_all(&self.pool)
                    .await?;
            names.extend(rows.into_iter().map(|(id, name)| (ParticipantRef::player(id), name)));
        }
        if !club_ids.is_empty() {
            let rows: Vec<(Uuid, String)> =
                sqlx::query_as("SELECT id, name FROM clubs WHERE id = ANY($1)")
                    .bind(&club_ids)
                    .fetch_all(&self.pool)
                    .await?;
            names.extend(rows.into_iter().map(|(id, name)| (ParticipantRef::club(id), name)));
        }
        Ok(names)
    }
}

fn map_unique(err: sqlx::Error, what: &str) -> AppError {
    if AppError::is_unique_violation(&err) {
        AppError::Conflict(what.to_string())
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl MessagingRepository for PgStore {
    async fn append_message(
        &self,
        draft: &NewMessage,
        sent_at: DateTime<Utc>,
    ) -> AppResult<(Message, Conversation)> {
        match self
            .retrying("append_message", || self.append_message_once(draft, sent_at))
            .await
        {
            // A retry after a commit whose acknowledgement was lost hits the
            // primary key; the first attempt's rows are the result.
            Err(AppError::Conflict(_)) => self.already_appended(draft.id).await,
            other => other,
        }
    }

    async fn find_message(&self, id: Uuid) -> AppResult<Option<Message>> {
        self.retrying("find_message", || async move {
            sqlx::query_as::<_, MessageRecord>(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Message::try_from)
            .transpose()
        })
        .await
    }

    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        self.retrying("find_conversation", || self.fetch_conversation(id))
            .await
    }

    async fn list_conversations(
        &self,
        viewer: ParticipantRef,
    ) -> AppResult<Vec<(Conversation, i64)>> {
        let rows = self
            .retrying("list_conversations", || async move {
                let rows = sqlx::query_as::<_, ConversationWithUnreadRecord>(&format!(
                    r#"
                    SELECT {CONVERSATION_COLUMNS},
                        (
                            SELECT COUNT(*) FROM messages m
                            WHERE m.conversation_id = c.id
                              AND m.receiver_type = $1
                              AND m.receiver_id = $2
                              AND m.read_at IS NULL
                        ) AS unread_count
                    FROM conversations c
                    WHERE (c.participant_1_type = $1 AND c.participant_1_id = $2
                           AND NOT c.participant_1_hidden)
                       OR (c.participant_2_type = $1 AND c.participant_2_id = $2
                           AND NOT c.participant_2_hidden)
                    ORDER BY c.last_message_at DESC, c.id
                    "#
                ))
                .bind(viewer.kind.as_str())
                .bind(viewer.id)
                .fetch_all(&self.pool)
                .await?;
                Ok::<_, AppError>(rows)
            })
            .await?;

        rows.into_iter()
            .map(|r| Ok((Conversation::try_from(r.conversation)?, r.unread_count)))
            .collect()
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<Message>> {
        let rows = self
            .retrying("list_messages", || async move {
                let rows = sqlx::query_as::<_, MessageRecord>(&format!(
                    r#"
                    SELECT {MESSAGE_COLUMNS} FROM (
                        SELECT {MESSAGE_COLUMNS} FROM messages
                        WHERE conversation_id = $1
                        ORDER BY created_at DESC
                        LIMIT $2 OFFSET $3
                    ) newest
                    ORDER BY created_at ASC
                    "#
                ))
                .bind(conversation_id)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await?;
                Ok::<_, AppError>(rows)
            })
            .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn mark_read(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
        snapshot: DateTime<Utc>,
    ) -> AppResult<MarkReadOutcome> {
        self.retrying("mark_read", || {
            self.mark_read_once(conversation_id, viewer, snapshot)
        })
        .await
    }

    async fn hide_for(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
    ) -> AppResult<ConversationAccess> {
        self.retrying("hide_for", || self.hide_once(conversation_id, viewer))
            .await
    }

    async fn unread_total(&self, viewer: ParticipantRef) -> AppResult<i64> {
        self.retrying("unread_total", || async move {
            let total: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM messages m
                JOIN conversations c ON c.id = m.conversation_id
                WHERE m.receiver_type = $1
                  AND m.receiver_id = $2
                  AND m.read_at IS NULL
                  AND NOT (
                      (c.participant_1_type = $1 AND c.participant_1_id = $2 AND c.participant_1_hidden)
                   OR (c.participant_2_type = $1 AND c.participant_2_id = $2 AND c.participant_2_hidden)
                  )
                "#,
            )
            .bind(viewer.kind.as_str())
            .bind(viewer.id)
            .fetch_one(&self.pool)
            .await?;
            Ok::<_, AppError>(total)
        })
        .await
    }
}

#[async_trait]
impl DirectoryRepository for PgStore {
    async fn insert_player(&self, player: &Player) -> AppResult<()> {
        self.retrying("insert_player", || async move {
            sqlx::query(&format!(
                "INSERT INTO players ({PLAYER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            ))
            .bind(player.id)
            .bind(&player.name)
            .bind(&player.email)
            .bind(&player.position)
            .bind(player.experience_level.as_str())
            .bind(&player.location)
            .bind(&player.bio)
            .bind(player.age)
            .bind(player.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique(e, "players.email"))?;
            Ok::<_, AppError>(())
        })
        .await
    }

    async fn update_player(&self, player: &Player) -> AppResult<()> {
        let result = self
            .retrying("update_player", || async move {
                sqlx::query(
                    r#"
                    UPDATE players
                    SET name = $2, email = $3, position = $4, experience_level = $5,
                        location = $6, bio = $7, age = $8
                    WHERE id = $1
                    "#,
                )
                .bind(player.id)
                .bind(&player.name)
                .bind(&player.email)
                .bind(&player.position)
                .bind(player.experience_level.as_str())
                .bind(&player.location)
                .bind(&player.bio)
                .bind(player.age)
                .execute(&self.pool)
                .await
                .map_err(|e| map_unique(e, "players.email"))
            })
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Player not found".into()));
        }
        Ok(())
    }

    async fn list_players(&self) -> AppResult<Vec<Player>> {
        let rows = self
            .retrying("list_players", || async move {
                let rows = sqlx::query_as::<_, PlayerRecord>(&format!(
                    "SELECT {PLAYER_COLUMNS} FROM players ORDER BY created_at, id"
                ))
                .fetch_all(&self.pool)
                .await?;
                Ok::<_, AppError>(rows)
            })
            .await?;
        rows.into_iter().map(Player::try_from).collect()
    }

    async fn find_player(&self, id: Uuid) -> AppResult<Option<Player>> {
        self.retrying("find_player", || async move {
            sqlx::query_as::<_, PlayerRecord>(&format!(
                "SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Player::try_from)
            .transpose()
        })
        .await
    }

    async fn insert_club(&self, club: &Club) -> AppResult<()> {
        self.retrying("insert_club", || async move {
            sqlx::query(&format!(
                "INSERT INTO clubs ({CLUB_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ))
            .bind(club.id)
            .bind(&club.name)
            .bind(&club.email)
            .bind(&club.location)
            .bind(&club.description)
            .bind(&club.contact_info)
            .bind(club.established_year)
            .bind(club.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique(e, "clubs.email"))?;
            Ok::<_, AppError>(())
        })
        .await
    }

    async fn update_club(&self, club: &Club) -> AppResult<()> {
        let result = self
            .retrying("update_club", || async move {
                sqlx::query(
                    r#"
                    UPDATE clubs
                    SET name = $2, email = $3, location = $4, description = $5,
                        contact_info = $6, established_year = $7
                    WHERE id = $1
                    "#,
                )
                .bind(club.id)
                .bind(&club.name)
                .bind(&club.email)
                .bind(&club.location)
                .bind(&club.description)
                .bind(&club.contact_info)
                .bind(club.established_year)
                .execute(&self.pool)
                .await
                .map_err(|e| map_unique(e, "clubs.email"))
            })
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Club not found".into()));
        }
        Ok(())
    }

    async fn list_clubs(&self) -> AppResult<Vec<Club>> {
        self.retrying("list_clubs", || async move {
            let rows = sqlx::query_as::<_, Club>(&format!(
                "SELECT {CLUB_COLUMNS} FROM clubs ORDER BY created_at, id"
            ))
            .fetch_all(&self.pool)
            .await?;
            Ok::<_, AppError>(rows)
        })
        .await
    }

    async fn find_club(&self, id: Uuid) -> AppResult<Option<Club>> {
        self.retrying("find_club", || async move {
            let row = sqlx::query_as::<_, Club>(&format!(
                "SELECT {CLUB_COLUMNS} FROM clubs WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok::<_, AppError>(row)
        })
        .await
    }

    async fn display_names(
        &self,
        participants: &[ParticipantRef],
    ) -> AppResult<HashMap<ParticipantRef, String>> {
        self.retrying("display_names", || self.display_names_once(participants))
            .await
    }
}

#[async_trait]
impl RecruitingRepository for PgStore {
    async fn insert_vacancy(&self, vacancy: &Vacancy) -> AppResult<()> {
        self.retrying("insert_vacancy", || async move {
            sqlx::query(&format!(
                "INSERT INTO vacancies ({VACANCY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
            ))
            .bind(vacancy.id)
            .bind(vacancy.club_id)
            .bind(&vacancy.club_name)
            .bind(&vacancy.position)
            .bind(&vacancy.description)
            .bind(&vacancy.requirements)
            .bind(vacancy.experience_level.as_str())
            .bind(&vacancy.location)
            .bind(vacancy.created_at)
            .execute(&self.pool)
            .await?;
            Ok::<_, AppError>(())
        })
        .await
    }

    async fn list_vacancies(&self, club_id: Option<Uuid>) -> AppResult<Vec<Vacancy>> {
        let rows = self
            .retrying("list_vacancies", || async move {
                let rows = sqlx::query_as::<_, VacancyRecord>(&format!(
                    r#"
                    SELECT {VACANCY_COLUMNS} FROM vacancies
                    WHERE ($1::uuid IS NULL OR club_id = $1)
                    ORDER BY created_at DESC, id
                    "#
                ))
                .bind(club_id)
                .fetch_all(&self.pool)
                .await?;
                Ok::<_, AppError>(rows)
            })
            .await?;
        rows.into_iter().map(Vacancy::try_from).collect()
    }

    async fn find_vacancy(&self, id: Uuid) -> AppResult<Option<Vacancy>> {
        self.retrying("find_vacancy", || async move {
            sqlx::query_as::<_, VacancyRecord>(&format!(
                "SELECT {VACANCY_COLUMNS} FROM vacancies WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Vacancy::try_from)
            .transpose()
        })
        .await
    }

    async fn insert_application(&self, application: &Application) -> AppResult<()> {
        self.retrying("insert_application", || async move {
            sqlx::query(&format!(
                "INSERT INTO applications ({APPLICATION_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ))
            .bind(application.id)
            .bind(application.player_id)
            .bind(&application.player_name)
            .bind(application.vacancy_id)
            .bind(&application.vacancy_position)
            .bind(&application.club_name)
            .bind(application.status.as_str())
            .bind(application.applied_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique(e, "applications.player_vacancy"))?;
            Ok::<_, AppError>(())
        })
        .await
    }

    async fn find_application(
        &self,
        player_id: Uuid,
        vacancy_id: Uuid,
    ) -> AppResult<Option<Application>> {
        self.retrying("find_application", || async move {
            sqlx::query_as::<_, ApplicationRecord>(&format!(
                "SELECT {APPLICATION_COLUMNS} FROM applications WHERE player_id = $1 AND vacancy_id = $2"
            ))
            .bind(player_id)
            .bind(vacancy_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Application::try_from)
            .transpose()
        })
        .await
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> AppResult<Vec<Application>> {
        let (condition, id) = match filter {
            ApplicationFilter::All => ("TRUE", None),
            ApplicationFilter::Player(id) => ("player_id = $1", Some(id)),
            ApplicationFilter::Club(id) => (
                "vacancy_id IN (SELECT id FROM vacancies WHERE club_id = $1)",
                Some(id),
            ),
        };
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE {condition} ORDER BY applied_at DESC, id"
        );
        let sql = sql.as_str();

        let rows = self
            .retrying("list_applications", || async move {
                let mut query = sqlx::query_as::<_, ApplicationRecord>(sql);
                if let Some(id) = id {
                    query = query.bind(id);
                }
                Ok::<_, AppError>(query.fetch_all(&self.pool).await?)
            })
            .await?;
        rows.into_iter().map(Application::try_from).collect()
    }
}

// Row records. Enumerations are stored as text and decoded here.

fn decode<T: std::str::FromStr<Err = AppError>>(raw: &str, column: &str) -> AppResult<T> {
    raw.parse().map_err(|_| {
        tracing::error!(column, value = raw, "unexpected enum value in database");
        AppError::Internal
    })
}

#[derive(sqlx::FromRow)]
struct ConversationRecord {
    id: Uuid,
    participant_1_id: Uuid,
    participant_1_type: String,
    participant_2_id: Uuid,
    participant_2_type: String,
    last_message_at: DateTime<Utc>,
    last_message_content: String,
    participant_1_hidden: bool,
    participant_2_hidden: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = AppError;

    fn try_from(r: ConversationRecord) -> AppResult<Self> {
        Ok(Conversation {
            id: r.id,
            participant_1: ParticipantRef::new(
                r.participant_1_id,
                decode(&r.participant_1_type, "participant_1_type")?,
            ),
            participant_2: ParticipantRef::new(
                r.participant_2_id,
                decode(&r.participant_2_type, "participant_2_type")?,
            ),
            last_message_at: r.last_message_at,
            last_message_content: r.last_message_content,
            participant_1_hidden: r.participant_1_hidden,
            participant_2_hidden: r.participant_2_hidden,
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ConversationWithUnreadRecord {
    #[sqlx(flatten)]
    conversation: ConversationRecord,
    unread_count: i64,
}

#[derive(sqlx::FromRow)]
struct MessageRecord {
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    sender_type: String,
    receiver_id: Uuid,
    receiver_type: String,
    subject: Option<String>,
    content: String,
    reply_to_message_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = AppError;

    fn try_from(r: MessageRecord) -> AppResult<Self> {
        Ok(Message {
            id: r.id,
            conversation_id: r.conversation_id,
            sender_id: r.sender_id,
            sender_type: decode(&r.sender_type, "sender_type")?,
            receiver_id: r.receiver_id,
            receiver_type: decode(&r.receiver_type, "receiver_type")?,
            subject: r.subject,
            content: r.content,
            reply_to_message_id: r.reply_to_message_id,
            created_at: r.created_at,
            read_at: r.read_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PlayerRecord {
    id: Uuid,
    name: String,
    email: String,
    position: String,
    experience_level: String,
    location: String,
    bio: Option<String>,
    age: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PlayerRecord> for Player {
    type Error = AppError;

    fn try_from(r: PlayerRecord) -> AppResult<Self> {
        Ok(Player {
            id: r.id,
            name: r.name,
            email: r.email,
            position: r.position,
            experience_level: decode::<ExperienceLevel>(&r.experience_level, "experience_level")?,
            location: r.location,
            bio: r.bio,
            age: r.age,
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VacancyRecord {
    id: Uuid,
    club_id: Uuid,
    club_name: String,
    position: String,
    description: String,
    requirements: Option<String>,
    experience_level: String,
    location: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<VacancyRecord> for Vacancy {
    type Error = AppError;

    fn try_from(r: VacancyRecord) -> AppResult<Self> {
        Ok(Vacancy {
            id: r.id,
            club_id: r.club_id,
            club_name: r.club_name,
            position: r.position,
            description: r.description,
            requirements: r.requirements,
            experience_level: decode::<ExperienceLevel>(&r.experience_level, "experience_level")?,
            location: r.location,
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationRecord {
    id: Uuid,
    player_id: Uuid,
    player_name: String,
    vacancy_id: Uuid,
    vacancy_position: String,
    club_name: String,
    status: String,
    applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRecord> for Application {
    type Error = AppError;

    fn try_from(r: ApplicationRecord) -> AppResult<Self> {
        Ok(Application {
            id: r.id,
            player_id: r.player_id,
            player_name: r.player_name,
            vacancy_id: r.vacancy_id,
            vacancy_position: r.vacancy_position,
            club_name: r.club_name,
            status: decode::<ApplicationStatus>(&r.status, "status")?,
            applied_at: r.applied_at,
        })
    }
}
