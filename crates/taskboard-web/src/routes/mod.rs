//! Route handlers.

pub mod board_html;
pub mod health;
pub mod projects;

use axum::http::StatusCode;
use taskboard_core::BoardError;

/// Map a board error to a status code and message.
pub(crate) fn board_error(e: BoardError) -> (StatusCode, String) {
    let status = match &e {
        BoardError::ElementNotFound(_) => StatusCode::NOT_FOUND,
        BoardError::InvalidDragTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

pub(crate) fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
