use super::authenticated_caller;
use crate::error::{AppError, AppResult};
use crate::models::participant::parse_id;
use crate::models::{ConversationSummary, Message, PageRequest, ParticipantRef};
use crate::services::ConversationService;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

/// Caller identity plus optional paging, all as raw strings so malformed
/// values surface as validation errors in the standard envelope.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    pub user_id: Option<String>,
    pub user_type: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl ViewerQuery {
    async fn caller(&self, state: &AppState, headers: &HeaderMap) -> AppResult<ParticipantRef> {
        authenticated_caller(
            state,
            headers,
            self.user_id.as_deref(),
            self.user_type.as_deref(),
        )
        .await
    }

    fn page(&self, default_size: u32) -> AppResult<PageRequest> {
        PageRequest::new(
            parse_number(self.page.as_deref(), "page")?,
            parse_number(self.page_size.as_deref(), "page_size")?,
            default_size,
        )
    }
}

fn parse_number(raw: Option<&str>, what: &str) -> AppResult<Option<u32>> {
    raw.map(|v| {
        v.trim()
            .parse::<u32>()
            .map_err(|_| AppError::BadRequest(format!("Invalid {what}: {v}")))
    })
    .transpose()
}

/// GET /api/conversations/:user_id/:user_type
/// GET /api/conversations/:conversation_id/messages
pub async fn get_by_segment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, segment)): Path<(String, String)>,
    Query(q): Query<ViewerQuery>,
) -> Result<Response, AppError> {
    if segment == "messages" {
        let messages = list_messages(&state, &headers, &id, &q).await?;
        return Ok(Json(messages).into_response());
    }
    let summaries = list_conversations(&state, &headers, &id, &segment).await?;
    Ok(Json(summaries).into_response())
}

async fn list_conversations(
    state: &AppState,
    headers: &HeaderMap,
    user_id: &str,
    user_type: &str,
) -> AppResult<Vec<ConversationSummary>> {
    let viewer = ParticipantRef::parse(user_id, user_type)?;
    state.sessions.verify(headers, viewer).await?;
    ConversationService::list_for(state.messaging.as_ref(), state.directory.as_ref(), viewer).await
}

async fn list_messages(
    state: &AppState,
    headers: &HeaderMap,
    conversation_id: &str,
    q: &ViewerQuery,
) -> AppResult<Vec<Message>> {
    let conversation_id = parse_id(conversation_id, "conversation id")?;
    let viewer = q.caller(state, headers).await?;
    let page = q.page(state.config.default_page_size)?;
    ConversationService::messages(state.messaging.as_ref(), conversation_id, viewer, page).await
}

/// PUT /api/conversations/:conversation_id/mark-read
pub async fn put_by_segment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, segment)): Path<(String, String)>,
    Query(q): Query<ViewerQuery>,
) -> Result<StatusCode, AppError> {
    if segment != "mark-read" {
        return Err(AppError::NotFound("Resource not found".into()));
    }
    let conversation_id = parse_id(&id, "conversation id")?;
    let viewer = q.caller(&state, &headers).await?;

    ConversationService::mark_read(state.messaging.as_ref(), conversation_id, viewer).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/conversations/:conversation_id
///
/// Hides the conversation for the caller only.
pub async fn hide_conversation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(q): Query<ViewerQuery>,
) -> Result<StatusCode, AppError> {
    let conversation_id = parse_id(&id, "conversation id")?;
    let viewer = q.caller(&state, &headers).await?;

    ConversationService::hide(state.messaging.as_ref(), conversation_id, viewer).await?;
    Ok(StatusCode::NO_CONTENT)
}
