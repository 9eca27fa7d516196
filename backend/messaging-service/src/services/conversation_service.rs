use crate::error::{AppError, AppResult};
use crate::models::{
    now_micros, ConversationAccess, ConversationSummary, ConversationView, MarkReadOutcome,
    Message, PageRequest, ParticipantRef,
};
use crate::repository::{DirectoryRepository, MessagingRepository};
use uuid::Uuid;

const UNKNOWN_NAME: &str = "Unknown";

pub struct ConversationService;

impl ConversationService {
    /// Conversations visible to `viewer`, newest activity first, with display
    /// names and the viewer's unread count.
    pub async fn list_for(
        messaging: &dyn MessagingRepository,
        directory: &dyn DirectoryRepository,
        viewer: ParticipantRef,
    ) -> AppResult<Vec<ConversationSummary>> {
        let rows = messaging.list_conversations(viewer).await?;

        let mut participants: Vec<ParticipantRef> = rows
            .iter()
            .flat_map(|(c, _)| [c.participant_1, c.participant_2])
            .collect();
        participants.sort();
        participants.dedup();
        let names = directory.display_names(&participants).await?;
        let name_of = |who: ParticipantRef| {
            names
                .get(&who)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_NAME.to_string())
        };

        Ok(rows
            .into_iter()
            .map(|(conversation, unread_count)| {
                let first = name_of(conversation.participant_1);
                let second = name_of(conversation.participant_2);
                ConversationSummary {
                    conversation: ConversationView::new(conversation, first, second),
                    unread_count,
                }
            })
            .collect())
    }

    pub async fn messages(
        messaging: &dyn MessagingRepository,
        conversation_id: Uuid,
        viewer: ParticipantRef,
        page: PageRequest,
    ) -> AppResult<Vec<Message>> {
        let conversation = messaging
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".into()))?;

        if !conversation.has_participant(viewer) {
            tracing::warn!(
                conversation_id = %conversation_id,
                viewer = %viewer,
                "message listing by non-participant rejected"
            );
            return Err(AppError::Forbidden("Not a participant in this conversation".into()));
        }

        messaging.list_messages(conversation_id, page).await
    }

    /// Marks messages addressed to `viewer` as read, up to the moment this call
    /// started. A missing conversation is a no-op.
    pub async fn mark_read(
        messaging: &dyn MessagingRepository,
        conversation_id: Uuid,
        viewer: ParticipantRef,
    ) -> AppResult<u64> {
        let snapshot = now_micros();
        match messaging.mark_read(conversation_id, viewer, snapshot).await? {
            MarkReadOutcome::Marked(count) => {
                tracing::debug!(conversation_id = %conversation_id, viewer = %viewer, count, "marked read");
                Ok(count)
            }
            MarkReadOutcome::NotParticipant => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    viewer = %viewer,
                    "mark-read by non-participant rejected"
                );
                Err(AppError::Forbidden("Not a participant in this conversation".into()))
            }
            MarkReadOutcome::Missing => {
                tracing::debug!(conversation_id = %conversation_id, "mark-read on missing conversation");
                Ok(0)
            }
        }
    }

    /// Hides the conversation for `viewer` only; the other side keeps it.
    pub async fn hide(
        messaging: &dyn MessagingRepository,
        conversation_id: Uuid,
        viewer: ParticipantRef,
    ) -> AppResult<()> {
        match messaging.hide_for(conversation_id, viewer).await? {
            ConversationAccess::Granted => {
                tracing::info!(conversation_id = %conversation_id, viewer = %viewer, "conversation hidden");
                Ok(())
            }
            ConversationAccess::NotParticipant => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    viewer = %viewer,
                    "hide by non-participant rejected"
                );
                Err(AppError::Forbidden("Not a participant in this conversation".into()))
            }
            ConversationAccess::Missing => Err(AppError::NotFound("Conversation not found".into())),
        }
    }

    pub async fn unread_count(
        messaging: &dyn MessagingRepository,
        viewer: ParticipantRef,
    ) -> AppResult<i64> {
        messaging.unread_total(viewer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Club, NewMessage};
    use crate::repository::InMemoryStore;
    use chrono::Duration;

    fn draft(from: ParticipantRef, to: ParticipantRef, content: &str) -> NewMessage {
        NewMessage {
            id: Uuid::new_v4(),
            sender: from,
            receiver: to,
            subject: None,
            content: content.into(),
            reply_to_message_id: None,
        }
    }

    #[tokio::test]
    async fn missing_names_render_as_unknown() {
        let store = InMemoryStore::new();
        let club = Club {
            id: Uuid::new_v4(),
            name: "HC Delft".into(),
            email: "club@example.com".into(),
            location: "Delft".into(),
            description: None,
            contact_info: None,
            established_year: None,
            created_at: now_micros(),
        };
        store.insert_club(&club).await.unwrap();
        let club_ref = ParticipantRef::club(club.id);
        let ghost = ParticipantRef::player(Uuid::new_v4());
        store
            .append_message(&draft(ghost, club_ref, "hey"), now_micros())
            .await
            .unwrap();

        let list = ConversationService::list_for(&store, &store, club_ref).await.unwrap();
        assert_eq!(list.len(), 1);
        let view = &list[0].conversation;
        // Clubs sort before players in a normalized pair.
        assert_eq!(view.participant_1_name, "HC Delft");
        assert_eq!(view.participant_2_name, "Unknown");
        assert_eq!(list[0].unread_count, 1);
    }

    #[tokio::test]
    async fn mark_read_keeps_messages_newer_than_the_snapshot() {
        let store = InMemoryStore::new();
        let a = ParticipantRef::player(Uuid::new_v4());
        let b = ParticipantRef::club(Uuid::new_v4());
        let (_, conv) = store
            .append_message(&draft(a, b, "before"), now_micros())
            .await
            .unwrap();
        let snapshot = now_micros();
        store
            .append_message(&draft(a, b, "after"), snapshot + Duration::milliseconds(5))
            .await
            .unwrap();

        let outcome = store.mark_read(conv.id, b, snapshot).await.unwrap();
        assert_eq!(outcome, MarkReadOutcome::Marked(1));
        assert_eq!(store.unread_total(b).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn access_errors_map_to_forbidden_and_not_found() {
        let store = InMemoryStore::new();
        let a = ParticipantRef::player(Uuid::new_v4());
        let b = ParticipantRef::club(Uuid::new_v4());
        let outsider = ParticipantRef::player(Uuid::new_v4());
        let (_, conv) = store
            .append_message(&draft(a, b, "hi"), now_micros())
            .await
            .unwrap();
        let page = PageRequest::new(None, None, 50).unwrap();

        assert!(matches!(
            ConversationService::messages(&store, conv.id, outsider, page).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ConversationService::mark_read(&store, conv.id, outsider).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ConversationService::hide(&store, conv.id, outsider).await,
            Err(AppError::Forbidden(_))
        ));

        let missing = Uuid::new_v4();
        assert!(matches!(
            ConversationService::messages(&store, missing, a, page).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ConversationService::hide(&store, missing, a).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(ConversationService::mark_read(&store, missing, a).await.unwrap(), 0);
    }
}
