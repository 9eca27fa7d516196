use crate::error::{AppError, AppResult};
use crate::middleware::logging::add_tracing;
use crate::models::ParticipantRef;
use crate::state::AppState;
use axum::http::HeaderMap;
use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

pub mod applications;
pub mod clubs;
pub mod conversations;
pub mod messages;
pub mod players;
pub mod vacancies;

async fn api_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Field Hockey Connect API" }))
}

/// Resolve the caller named by query parameters and check it against the
/// configured session verifier.
pub(crate) async fn authenticated_caller(
    state: &AppState,
    headers: &HeaderMap,
    id: Option<&str>,
    kind: Option<&str>,
) -> AppResult<ParticipantRef> {
    let (Some(id), Some(kind)) = (id, kind) else {
        return Err(AppError::BadRequest("Caller id and type are required".into()));
    };
    let caller = ParticipantRef::parse(id, kind)?;
    state.sessions.verify(headers, caller).await?;
    Ok(caller)
}

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let router = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/", get(api_root))
        // Directory
        .route(
            "/api/players",
            post(players::create_player).get(players::list_players),
        )
        .route(
            "/api/players/:id",
            get(players::get_player).put(players::update_player),
        )
        .route(
            "/api/players/:id/applications",
            get(applications::player_applications),
        )
        .route("/api/clubs", post(clubs::create_club).get(clubs::list_clubs))
        .route(
            "/api/clubs/:id",
            get(clubs::get_club).put(clubs::update_club),
        )
        .route("/api/clubs/:id/vacancies", get(vacancies::club_vacancies))
        .route(
            "/api/clubs/:id/applications",
            get(applications::club_applications),
        )
        // Recruiting
        .route(
            "/api/vacancies",
            post(vacancies::create_vacancy).get(vacancies::list_vacancies),
        )
        .route("/api/vacancies/:id", get(vacancies::get_vacancy))
        .route(
            "/api/applications",
            post(applications::create_application).get(applications::list_applications),
        )
        // Messaging
        .route("/api/messages/send", post(messages::send_message))
        .route(
            "/api/messages/unread-count/:user_id/:user_type",
            get(messages::unread_count),
        )
        // `{userId}/{userType}` listing and `{conversationId}/messages` share
        // one path shape, so the second segment is dispatched by hand.
        .route(
            "/api/conversations/:id/:segment",
            get(conversations::get_by_segment).put(conversations::put_by_segment),
        )
        .route(
            "/api/conversations/:id",
            delete(conversations::hide_conversation),
        )
        .with_state(state);

    add_tracing(with_http_layers(router, timeout))
}

/// CORS sits outside the timeout so that a 408 still carries CORS headers.
fn with_http_layers<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(timeout)),
    )
}
