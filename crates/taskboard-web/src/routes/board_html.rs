//! Server-rendered board.
//!
//! The page shell is static; the board markup inside it comes from the
//! mounted document on the board thread, so every client sees the same
//! rendered lists the components produced.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use taskboard_core::dom::{html::escape_text, EventOutcome};
use taskboard_core::validation::RawProjectInput;
use taskboard_core::{MoveOutcome, ProjectStatus};

use super::{board_error, internal};
use crate::state::AppState;

const SHELL_HTML: &str = include_str!("../../../../assets/web/index.html");
const BOARD_MARKER: &str = "<!-- board -->";
const NOTICE_MARKER: &str = "<!-- notice -->";

#[derive(Deserialize)]
pub struct DropForm {
    pub project_id: String,
    pub target: ProjectStatus,
}

fn page(board: &str, notice: Option<&str>) -> String {
    let notice = notice
        .map(|message| format!("<p class=\"notice\" role=\"alert\">{}</p>", escape_text(message)))
        .unwrap_or_default();
    SHELL_HTML
        .replace(NOTICE_MARKER, &notice)
        .replace(BOARD_MARKER, board)
}

/// GET / - Full page with the mounted board.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    let board = state.board.render_page().await.map_err(internal)?;
    Ok(Html(page(&board, None)))
}

/// GET /lists/{status} - One list section, for refreshing after a broadcast.
pub async fn list_fragment(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    let category = ProjectStatus::parse(&status)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown list: {}", status)))?;
    let html = state.board.render_list(category).await.map_err(internal)?;
    Ok(Html(html))
}

/// POST /projects - Plain form submission.
///
/// Success redirects back to the board; a rejected input re-renders the
/// page with the rejection notice and the entered values kept in the form.
pub async fn submit_form(State(state): State<AppState>, Form(input): Form<RawProjectInput>) -> Response {
    let outcome = match state.board.submit(input).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => return board_error(e).into_response(),
        Err(e) => return internal(e).into_response(),
    };

    match outcome {
        EventOutcome::Added(_) => Redirect::to("/").into_response(),
        EventOutcome::Rejected(failure) => match state.board.render_page().await {
            Ok(board) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(page(&board, Some(&failure.message))),
            )
                .into_response(),
            Err(e) => internal(e).into_response(),
        },
        EventOutcome::Move(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected outcome".to_string()).into_response(),
    }
}

/// POST /drop - A card released over a list.
pub async fn drop_card(
    State(state): State<AppState>,
    Form(form): Form<DropForm>,
) -> Result<Json<MoveOutcome>, (StatusCode, String)> {
    let outcome = state
        .board
        .drop_card(form.project_id, form.target)
        .await
        .map_err(internal)?
        .map_err(board_error)?;
    Ok(Json(outcome))
}
