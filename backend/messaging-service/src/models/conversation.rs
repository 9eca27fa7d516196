use super::participant::{ParticipantRef, ParticipantType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stored conversation between a normalized participant pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_1: ParticipantRef,
    pub participant_2: ParticipantRef,
    pub last_message_at: DateTime<Utc>,
    pub last_message_content: String,
    pub participant_1_hidden: bool,
    pub participant_2_hidden: bool,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, who: ParticipantRef) -> bool {
        self.participant_1 == who || self.participant_2 == who
    }

    pub fn is_hidden_for(&self, who: ParticipantRef) -> bool {
        (self.participant_1 == who && self.participant_1_hidden)
            || (self.participant_2 == who && self.participant_2_hidden)
    }
}

/// Conversation as rendered to clients, with display names resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationView {
    pub id: Uuid,
    pub participant_1_id: Uuid,
    pub participant_1_type: ParticipantType,
    pub participant_1_name: String,
    pub participant_2_id: Uuid,
    pub participant_2_type: ParticipantType,
    pub participant_2_name: String,
    pub last_message_at: DateTime<Utc>,
    pub last_message_content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationView {
    pub fn new(conversation: Conversation, participant_1_name: String, participant_2_name: String) -> Self {
        Self {
            id: conversation.id,
            participant_1_id: conversation.participant_1.id,
            participant_1_type: conversation.participant_1.kind,
            participant_1_name,
            participant_2_id: conversation.participant_2.id,
            participant_2_type: conversation.participant_2.kind,
            participant_2_name,
            last_message_at: conversation.last_message_at,
            last_message_content: conversation.last_message_content,
            created_at: conversation.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub conversation: ConversationView,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkReadOutcome {
    /// Number of messages whose read timestamp was set
    Marked(u64),
    NotParticipant,
    Missing,
}

/// Result of a participant-scoped conversation mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAccess {
    Granted,
    NotParticipant,
    Missing,
}
