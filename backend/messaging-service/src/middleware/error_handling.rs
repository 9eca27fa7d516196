use crate::error::AppError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use error_types::{error_codes, ErrorResponse};

/// Map domain errors to HTTP responses.
///
/// Server-side failures are logged here and rendered with a generic detail so
/// that storage errors never reach clients.
pub fn map_error(err: &AppError) -> (StatusCode, ErrorResponse) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (error_type, code) = match err {
        AppError::BadRequest(_) => ("validation_error", error_codes::INVALID_REQUEST),
        AppError::Unauthorized => ("authentication_error", error_codes::INVALID_CREDENTIALS),
        AppError::Forbidden(_) => ("authorization_error", error_codes::AUTHORIZATION_ERROR),
        AppError::NotFound(msg) if msg.starts_with("Conversation") => {
            ("not_found_error", error_codes::CONVERSATION_NOT_FOUND)
        }
        AppError::NotFound(msg) if msg.starts_with("Player") || msg.starts_with("Club") => {
            ("not_found_error", error_codes::PARTICIPANT_NOT_FOUND)
        }
        AppError::NotFound(_) => ("not_found_error", error_codes::RESOURCE_NOT_FOUND),
        AppError::Conflict(_) => ("conflict_error", error_codes::CONFLICT),
        AppError::Database(_) => ("server_error", error_codes::DATABASE_ERROR),
        AppError::Config(_) | AppError::StartServer(_) | AppError::Internal => {
            ("server_error", error_codes::INTERNAL_SERVER_ERROR)
        }
    };

    let message = if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    let response = ErrorResponse::new(
        match status {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
            _ => "Error",
        },
        &message,
        status.as_u16(),
        error_type,
        code,
    );

    (status, response)
}

pub fn into_response(err: AppError) -> impl IntoResponse {
    let (status, response) = map_error(&err);
    (status, Json(response))
}
