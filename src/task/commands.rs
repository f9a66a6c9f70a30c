use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;

use super::Task;
use super::TaskId;
use crate::appstate::AppState;

/// One rejected field in a task payload.
#[derive(Debug, Serialize, PartialEq)]
pub struct FieldError {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    msg: &'static str,
    path: &'static str,
    location: &'static str,
}

impl FieldError {
    fn invalid(path: &'static str, value: Option<&Value>) -> Self {
        Self {
            kind: "field",
            value: value.cloned(),
            msg: "Invalid value",
            path,
            location: "body",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Checks a `POST /tasks` body: `title` must be a string (stored trimmed)
/// and `completed` a boolean.
pub fn validate_new_task(body: &Value) -> Result<(String, bool), ValidationErrors> {
    let title = body.get("title");
    let completed = body.get("completed");

    let mut errors = Vec::new();

    let title = match title.and_then(Value::as_str) {
        Some(s) => Some(s.trim().to_string()),
        None => {
            errors.push(FieldError::invalid("title", title));
            None
        }
    };

    let completed = match completed.and_then(Value::as_bool) {
        Some(b) => Some(b),
        None => {
            errors.push(FieldError::invalid("completed", completed));
            None
        }
    };

    match (title, completed) {
        (Some(title), Some(completed)) => Ok((title, completed)),
        _ => Err(ValidationErrors { errors }),
    }
}

/// A body that is missing, not JSON, or sent without a JSON content type is
/// validated as an empty payload, so the client always gets the field errors.
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ValidationErrors> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!("unreadable task body: {rejection}");
            Value::Null
        }
    };
    let (title, completed) = validate_new_task(&body)?;

    let task = state.task_store.add(title, completed).await;
    tracing::debug!(id = task.id, "task added");

    Ok((StatusCode::CREATED, "Task added successfully"))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> &'static str {
    if !state.task_store.remove(id).await {
        tracing::debug!(id, "delete matched no task");
    }

    "Task deleted successfully"
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(task): Json<Task>,
) -> &'static str {
    if !state.task_store.replace(id, task).await {
        tracing::debug!(id, "update matched no task");
    }

    "Task updated successfully"
}
