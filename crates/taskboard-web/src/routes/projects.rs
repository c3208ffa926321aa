//! JSON project API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use taskboard_core::dom::EventOutcome;
use taskboard_core::validation::RawProjectInput;
use taskboard_core::{MoveOutcome, Project, ProjectStatus};

use super::{board_error, internal};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Number or string; checked by the same rules as the form field.
    #[serde(default)]
    pub people: Value,
}

#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub status: ProjectStatus,
}

impl CreateProjectRequest {
    fn into_raw(self) -> RawProjectInput {
        let people = match self.people {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        RawProjectInput {
            title: self.title,
            description: self.description,
            people,
        }
    }
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, (StatusCode, String)> {
    let projects = state.board.projects().await.map_err(internal)?;
    Ok(Json(projects))
}

/// POST /api/projects - Same path as the form: gatekeeper, then store.
pub async fn create_project(State(state): State<AppState>, Json(req): Json<CreateProjectRequest>) -> Response {
    let outcome = match state.board.submit(req.into_raw()).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => return board_error(e).into_response(),
        Err(e) => return internal(e).into_response(),
    };

    match outcome {
        EventOutcome::Added(project) => (StatusCode::CREATED, Json(project)).into_response(),
        EventOutcome::Rejected(failure) => (StatusCode::UNPROCESSABLE_ENTITY, Json(failure)).into_response(),
        EventOutcome::Move(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected outcome".to_string()).into_response(),
    }
}

/// PATCH /api/projects/{id} - Direct store move, no drag gesture involved.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Response {
    match state.board.move_project(id, req.status).await {
        Ok(outcome @ MoveOutcome::NotFound { .. }) => (StatusCode::NOT_FOUND, Json(outcome)).into_response(),
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => internal(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> CreateProjectRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_people_accepts_number_or_string() {
        let raw = request(json!({ "title": "T", "description": "Long enough", "people": 3 })).into_raw();
        assert_eq!(raw.people, "3");

        let raw = request(json!({ "title": "T", "description": "Long enough", "people": "4" })).into_raw();
        assert_eq!(raw.people, "4");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let raw = request(json!({})).into_raw();
        assert_eq!(raw, RawProjectInput::default());
    }
}
