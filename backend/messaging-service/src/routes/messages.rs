use super::authenticated_caller;
use crate::error::AppError;
use crate::models::{Message, ParticipantRef, SendMessageRequest};
use crate::services::{ConversationService, MessageService};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SenderQuery {
    pub sender_id: Option<String>,
    pub sender_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

/// POST /api/messages/send
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<SenderQuery>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let sender = authenticated_caller(
        &state,
        &headers,
        q.sender_id.as_deref(),
        q.sender_type.as_deref(),
    )
    .await?;
    let Json(request) = body?;

    let message = MessageService::send(
        state.messaging.as_ref(),
        state.directory.as_ref(),
        state.config.message_max_length,
        sender,
        request,
    )
    .await?;
    Ok(Json(message))
}

/// GET /api/messages/unread-count/:user_id/:user_type
pub async fn unread_count(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((user_id, user_type)): Path<(String, String)>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let viewer = ParticipantRef::parse(&user_id, &user_type)?;
    state.sessions.verify(&headers, viewer).await?;

    let unread_count = ConversationService::unread_count(state.messaging.as_ref(), viewer).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}
