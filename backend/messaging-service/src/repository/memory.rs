use super::{DirectoryRepository, MessagingRepository, RecruitingRepository};
use crate::error::{AppError, AppResult};
use crate::models::participant::normalize_pair;
use crate::models::{
    Application, ApplicationFilter, Club, Conversation, ConversationAccess, MarkReadOutcome,
    Message, NewMessage, PageRequest, ParticipantRef, ParticipantType, Player, Vacancy,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    players: HashMap<Uuid, Player>,
    clubs: HashMap<Uuid, Club>,
    conversations: HashMap<Uuid, Conversation>,
    pairs: HashMap<(ParticipantRef, ParticipantRef), Uuid>,
    /// Append-only; within one conversation insertion order is `created_at` order.
    messages: Vec<Message>,
    vacancies: Vec<Vacancy>,
    applications: Vec<Application>,
}

/// Process-local store. Every operation runs under one lock, which gives the
/// same per-pair serialization the PostgreSQL store gets from row locks.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagingRepository for InMemoryStore {
    async fn append_message(
        &self,
        draft: &NewMessage,
        sent_at: DateTime<Utc>,
    ) -> AppResult<(Message, Conversation)> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        if let Some(stored) = inner.messages.iter().find(|m| m.id == draft.id) {
            let conversation = inner
                .conversations
                .get(&stored.conversation_id)
                .ok_or(AppError::Internal)?;
            return Ok((stored.clone(), conversation.clone()));
        }
        let key = normalize_pair(draft.sender, draft.receiver);

        let existing = inner.pairs.get(&key).copied();
        let conversation_id = match existing {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                inner.conversations.insert(
                    id,
                    Conversation {
                        id,
                        participant_1: key.0,
                        participant_2: key.1,
                        last_message_at: sent_at,
                        last_message_content: String::new(),
                        participant_1_hidden: false,
                        participant_2_hidden: false,
                        created_at: sent_at,
                    },
                );
                inner.pairs.insert(key, id);
                id
            }
        };

        let conversation = inner
            .conversations
            .get_mut(&conversation_id)
            .ok_or(AppError::Internal)?;
        let created_at = match existing {
            None => sent_at,
            Some(_) => sent_at.max(conversation.last_message_at + Duration::microseconds(1)),
        };
        conversation.last_message_at = created_at;
        conversation.last_message_content = draft.content.clone();
        conversation.participant_1_hidden = false;
        conversation.participant_2_hidden = false;
        let conversation = conversation.clone();

        let message = Message {
            id: draft.id,
            conversation_id,
            sender_id: draft.sender.id,
            sender_type: draft.sender.kind,
            receiver_id: draft.receiver.id,
            receiver_type: draft.receiver.kind,
            subject: draft.subject.clone(),
            content: draft.content.clone(),
            reply_to_message_id: draft.reply_to_message_id,
            created_at,
            read_at: None,
        };
        inner.messages.push(message.clone());

        Ok((message, conversation))
    }

    async fn find_message(&self, id: Uuid) -> AppResult<Option<Message>> {
        let inner = self.inner.lock();
        Ok(inner.messages.iter().find(|m| m.id == id).cloned())
    }

    async fn find_conversation(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        Ok(self.inner.lock().conversations.get(&id).cloned())
    }

    async fn list_conversations(
        &self,
        viewer: ParticipantRef,
    ) -> AppResult<Vec<(Conversation, i64)>> {
        let inner = self.inner.lock();
        let mut visible: Vec<(Conversation, i64)> = inner
            .conversations
            .values()
            .filter(|c| c.has_participant(viewer) && !c.is_hidden_for(viewer))
            .map(|c| {
                let unread = inner
                    .messages
                    .iter()
                    .filter(|m| {
                        m.conversation_id == c.id && m.receiver() == viewer && m.read_at.is_none()
                    })
                    .count() as i64;
                (c.clone(), unread)
            })
            .collect();
        visible.sort_by(|(a, _), (b, _)| {
            b.last_message_at
                .cmp(&a.last_message_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(visible)
    }

    async fn list_messages(
        &self,
        conversation_id: Uuid,
        page: PageRequest,
    ) -> AppResult<Vec<Message>> {
        let inner = self.inner.lock();
        let thread: Vec<&Message> = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .collect();
        let skip = page.offset() as usize;
        let end = thread.len().saturating_sub(skip);
        let start = end.saturating_sub(page.page_size as usize);
        Ok(thread[start..end].iter().map(|m| (*m).clone()).collect())
    }

    async fn mark_read(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
        snapshot: DateTime<Utc>,
    ) -> AppResult<MarkReadOutcome> {
        let mut inner = self.inner.lock();
        match inner.conversations.get(&conversation_id) {
            None => return Ok(MarkReadOutcome::Missing),
            Some(c) if !c.has_participant(viewer) => return Ok(MarkReadOutcome::NotParticipant),
            Some(_) => {}
        }

        let mut marked = 0;
        for m in inner.messages.iter_mut().filter(|m| {
            m.conversation_id == conversation_id
                && m.receiver() == viewer
                && m.read_at.is_none()
                && m.created_at <= snapshot
        }) {
            m.read_at = Some(snapshot);
            marked += 1;
        }
        Ok(MarkReadOutcome::Marked(marked))
    }

    async fn hide_for(
        &self,
        conversation_id: Uuid,
        viewer: ParticipantRef,
    ) -> AppResult<ConversationAccess> {
        let mut inner = self.inner.lock();
        let Some(c) = inner.conversations.get_mut(&conversation_id) else {
            return Ok(ConversationAccess::Missing);
        };
        if c.participant_1 == viewer {
            c.participant_1_hidden = true;
        } else if c.participant_2 == viewer {
            c.participant_2_hidden = true;
        } else {
            return Ok(ConversationAccess::NotParticipant);
        }
        Ok(ConversationAccess::Granted)
    }

    async fn unread_total(&self, viewer: ParticipantRef) -> AppResult<i64> {
        let inner = self.inner.lock();
        let total = inner
            .messages
            .iter()
            .filter(|m| m.receiver() == viewer && m.read_at.is_none())
            .filter(|m| {
                inner
                    .conversations
                    .get(&m.conversation_id)
                    .is_some_and(|c| !c.is_hidden_for(viewer))
            })
            .count();
        Ok(total as i64)
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryStore {
    async fn insert_player(&self, player: &Player) -> AppResult<()> {
        let mut inner = self.inner.lock();
        if inner.players.values().any(|p| p.email == player.email) {
            return Err(AppError::Conflict("players.email".into()));
        }
        inner.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn update_player(&self, player: &Player) -> AppResult<()> {
        let mut inner = self.inner.lock();
        if inner
            .players
            .values()
            .any(|p| p.id != player.id && p.email == player.email)
        {
            return Err(AppError::Conflict("players.email".into()));
        }
        let stored = inner
            .players
            .get_mut(&player.id)
            .ok_or_else(|| AppError::NotFound("Player not found".into()))?;
        *stored = player.clone();
        Ok(())
    }

    async fn list_players(&self) -> AppResult<Vec<Player>> {
        let mut players: Vec<Player> = self.inner.lock().players.values().cloned().collect();
        players.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(players)
    }

    async fn find_player(&self, id: Uuid) -> AppResult<Option<Player>> {
        Ok(self.inner.lock().players.get(&id).cloned())
    }

    async fn insert_club(&self, club: &Club) -> AppResult<()> {
        let mut inner = self.inner.lock();
        if inner.clubs.values().any(|c| c.email == club.email) {
            return Err(AppError::Conflict("clubs.email".into()));
        }
        inner.clubs.insert(club.id, club.clone());
        Ok(())
    }

    async fn update_club(&self, club: &Club) -> AppResult<()> {
        let mut inner = self.inner.lock();
        if inner
            .clubs
            .values()
            .any(|c| c.id != club.id && c.email == club.email)
        {
            return Err(AppError::Conflict("clubs.email".into()));
        }
        let stored = inner
            .clubs
            .get_mut(&club.id)
            .ok_or_else(|| AppError::NotFound("Club not found".into()))?;
        *stored = club.clone();
        Ok(())
    }

    async fn list_clubs(&self) -> AppResult<Vec<Club>> {
        let mut clubs: Vec<Club> = self.inner.lock().clubs.values().cloned().collect();
        clubs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(clubs)
    }

    async fn find_club(&self, id: Uuid) -> AppResult<Option<Club>> {
        Ok(self.inner.lock().clubs.get(&id).cloned())
    }

    async fn display_names(
        &self,
        participants: &[ParticipantRef],
    ) -> AppResult<HashMap<ParticipantRef, String>> {
        let inner = self.inner.lock();
        Ok(participants
            .iter()
            .filter_map(|who| {
                let name = match who.kind {
                    ParticipantType::Player => inner.players.get(&who.id).map(|p| p.name.clone()),
                    ParticipantType::Club => inner.clubs.get(&who.id).map(|c| c.name.clone()),
                };
                name.map(|n| (*who, n))
            })
            .collect())
    }
}

#[async_trait]
impl RecruitingRepository for InMemoryStore {
    async fn insert_vacancy(&self, vacancy: &Vacancy) -> AppResult<()> {
        self.inner.lock().vacancies.push(vacancy.clone());
        Ok(())
    }

    async fn list_vacancies(&self, club_id: Option<Uuid>) -> AppResult<Vec<Vacancy>> {
        let inner = self.inner.lock();
        let mut vacancies: Vec<Vacancy> = inner
            .vacancies
            .iter()
            .filter(|v| club_id.map_or(true, |id| v.club_id == id))
            .cloned()
            .collect();
        vacancies.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(vacancies)
    }

    async fn find_vacancy(&self, id: Uuid) -> AppResult<Option<Vacancy>> {
        Ok(self.inner.lock().vacancies.iter().find(|v| v.id == id).cloned())
    }

    async fn insert_application(&self, application: &Application) -> AppResult<()> {
        let mut inner = self.inner.lock();
        if inner
            .applications
            .iter()
            .any(|a| a.player_id == application.player_id && a.vacancy_id == application.vacancy_id)
        {
            return Err(AppError::Conflict("applications.player_vacancy".into()));
        }
        inner.applications.push(application.clone());
        Ok(())
    }

    async fn find_application(
        &self,
        player_id: Uuid,
        vacancy_id: Uuid,
    ) -> AppResult<Option<Application>> {
        Ok(self
            .inner
            .lock()
            .applications
            .iter()
            .find(|a| a.player_id == player_id && a.vacancy_id == vacancy_id)
            .cloned())
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> AppResult<Vec<Application>> {
        let inner = self.inner.lock();
        let mut applications: Vec<Application> = inner
            .applications
            .iter()
            .filter(|a| match filter {
                ApplicationFilter::All => true,
                ApplicationFilter::Player(id) => a.player_id == id,
                ApplicationFilter::Club(club_id) => inner
                    .vacancies
                    .iter()
                    .any(|v| v.id == a.vacancy_id && v.club_id == club_id),
            })
            .cloned()
            .collect();
        applications.sort_by(|a, b| {
            b.applied_at
                .cmp(&a.applied_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(applications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now_micros, ApplicationStatus, ExperienceLevel};

    fn vacancy(club_id: Uuid, created_at: DateTime<Utc>) -> Vacancy {
        Vacancy {
            id: Uuid::new_v4(),
            club_id,
            club_name: "Oranje-Rood".into(),
            position: "Forward".into(),
            description: "Second team".into(),
            requirements: None,
            experience_level: ExperienceLevel::Intermediate,
            location: "Eindhoven".into(),
            created_at,
        }
    }

    #[tokio::test]
    async fn equal_timestamps_are_ordered_by_id() {
        let store = InMemoryStore::new();
        let club_id = Uuid::new_v4();
        let at = now_micros();
        let older = vacancy(club_id, at - Duration::seconds(1));
        let mut tied: Vec<Vacancy> = (0..4).map(|_| vacancy(club_id, at)).collect();
        for v in tied.iter().chain(std::iter::once(&older)) {
            store.insert_vacancy(v).await.unwrap();
        }

        tied.sort_by_key(|v| v.id);
        let mut expected: Vec<Uuid> = tied.iter().map(|v| v.id).collect();
        expected.push(older.id);
        let listed: Vec<Uuid> = store
            .list_vacancies(Some(club_id))
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(listed, expected);

        let mut applications: Vec<Application> = tied
            .iter()
            .map(|v| Application {
                id: Uuid::new_v4(),
                player_id: Uuid::new_v4(),
                player_name: "Eva".into(),
                vacancy_id: v.id,
                vacancy_position: v.position.clone(),
                club_name: v.club_name.clone(),
                status: ApplicationStatus::Pending,
                applied_at: at,
            })
            .collect();
        for a in &applications {
            store.insert_application(a).await.unwrap();
        }
        applications.sort_by_key(|a| a.id);
        let listed = store
            .list_applications(ApplicationFilter::Club(club_id))
            .await
            .unwrap();
        assert_eq!(listed, applications);
    }

    #[tokio::test]
    async fn repeated_draft_returns_the_stored_message() {
        let store = InMemoryStore::new();
        let draft = NewMessage {
            id: Uuid::new_v4(),
            sender: ParticipantRef::player(Uuid::new_v4()),
            receiver: ParticipantRef::club(Uuid::new_v4()),
            subject: None,
            content: "Trial on Saturday?".into(),
            reply_to_message_id: None,
        };
        let (first, conversation) = store.append_message(&draft, now_micros()).await.unwrap();
        let (again, same) = store.append_message(&draft, now_micros()).await.unwrap();

        assert_eq!(again, first);
        assert_eq!(same, conversation);
        let page = PageRequest::new(None, None, 50).unwrap();
        assert_eq!(store.list_messages(conversation.id, page).await.unwrap().len(), 1);
    }
}
