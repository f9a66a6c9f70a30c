use axum::Json;
use axum::extract::State;

use super::Task;
use crate::appstate::AppState;

pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.task_store.list().await)
}
