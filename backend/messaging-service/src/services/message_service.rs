use crate::error::{AppError, AppResult};
use crate::models::participant::parse_id;
use crate::models::{now_micros, Message, NewMessage, ParticipantRef, SendMessageRequest};
use crate::repository::{DirectoryRepository, MessagingRepository};
use uuid::Uuid;

pub const MAX_SUBJECT_LENGTH: usize = 200;

pub struct MessageService;

impl MessageService {
    /// Validate and store a message from `sender`, creating or resurfacing the
    /// pair's conversation in the same step.
    pub async fn send(
        messaging: &dyn MessagingRepository,
        directory: &dyn DirectoryRepository,
        max_length: usize,
        sender: ParticipantRef,
        request: SendMessageRequest,
    ) -> AppResult<Message> {
        let receiver = ParticipantRef::parse(&request.receiver_id, &request.receiver_type)?;
        Self::validate_content(&request.content, max_length)?;
        let subject = Self::normalize_subject(request.subject)?;

        if sender == receiver {
            return Err(AppError::BadRequest("Cannot send a message to yourself".into()));
        }

        let reply_to_message_id = request
            .reply_to_message_id
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_id(raw, "reply_to_message_id"))
            .transpose()?;

        for who in [sender, receiver] {
            if !directory.exists(who).await? {
                return Err(AppError::NotFound(format!("{} not found", who.kind.label())));
            }
        }

        if let Some(reply_id) = reply_to_message_id {
            let target = messaging.find_message(reply_id).await?;
            if !target.is_some_and(|m| m.is_between(sender, receiver)) {
                return Err(AppError::BadRequest(
                    "Reply target is not part of this conversation".into(),
                ));
            }
        }

        let draft = NewMessage {
            id: Uuid::new_v4(),
            sender,
            receiver,
            subject,
            content: request.content,
            reply_to_message_id,
        };
        let (message, conversation) = messaging.append_message(&draft, now_micros()).await?;

        tracing::info!(
            message_id = %message.id,
            conversation_id = %conversation.id,
            sender = %sender,
            receiver = %receiver,
            "message stored"
        );
        Ok(message)
    }

    fn validate_content(content: &str, max_length: usize) -> AppResult<()> {
        if content.trim().is_empty() {
            return Err(AppError::BadRequest("Message content cannot be empty".into()));
        }
        if content.chars().count() > max_length {
            return Err(AppError::BadRequest(format!(
                "Message content exceeds {max_length} characters"
            )));
        }
        Ok(())
    }

    /// Blank subjects are dropped.
    fn normalize_subject(subject: Option<String>) -> AppResult<Option<String>> {
        match subject {
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) if s.chars().count() > MAX_SUBJECT_LENGTH => Err(AppError::BadRequest(
                format!("Subject exceeds {MAX_SUBJECT_LENGTH} characters"),
            )),
            other => Ok(other),
        }
    }
}
