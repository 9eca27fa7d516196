use super::participant::{ParticipantRef, ParticipantType};
use crate::config::MAX_PAGE_SIZE;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_type: ParticipantType,
    pub receiver_id: Uuid,
    pub receiver_type: ParticipantType,
    pub subject: Option<String>,
    pub content: String,
    pub reply_to_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn sender(&self) -> ParticipantRef {
        ParticipantRef::new(self.sender_id, self.sender_type)
    }

    pub fn receiver(&self) -> ParticipantRef {
        ParticipantRef::new(self.receiver_id, self.receiver_type)
    }

    /// True when this message was exchanged between `a` and `b`, in either direction.
    pub fn is_between(&self, a: ParticipantRef, b: ParticipantRef) -> bool {
        (self.sender() == a && self.receiver() == b) || (self.sender() == b && self.receiver() == a)
    }
}

/// Body of `POST /api/messages/send`. Identifiers arrive as strings and are
/// validated by the service so malformed input maps to a 400.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub receiver_type: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub content: String,
    #[serde(default)]
    pub reply_to_message_id: Option<String>,
}

/// A validated message ready to be stored.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: Uuid,
    pub sender: ParticipantRef,
    pub receiver: ParticipantRef,
    pub subject: Option<String>,
    pub content: String,
    pub reply_to_message_id: Option<Uuid>,
}

/// Page selection for message listing. Pages count back from the newest
/// message: page 1 holds the latest `page_size` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, page_size: Option<u32>, default_size: u32) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::BadRequest("page starts at 1".into()));
        }
        let page_size = page_size.unwrap_or(default_size);
        if page_size == 0 {
            return Err(AppError::BadRequest("page_size must be positive".into()));
        }
        Ok(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// Number of newest messages to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}
