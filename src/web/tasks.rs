//! Task CRUD and reordering handlers.
//!
//! The two reorder endpoints return the full task list in canonical order so
//! the client can replace its optimistic state with the server's truth in
//! one step. Malformed bodies are mapped to 400 with a JSON error body
//! rather than axum's default rejection.

use crate::libs::error::{TaskError, TaskResult};
use crate::libs::task::{Direction, NewTask, Task, TaskOrder, TaskUpdate};
use crate::web::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

/// Body of `PUT /api/tasks/{id}/reorder`.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub direction: Direction,
}

/// Body of `PUT /api/tasks/reorder`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReorderRequest {
    pub task_orders: Vec<TaskOrder>,
}

pub async fn list(State(state): State<AppState>) -> TaskResult<Json<Vec<Task>>> {
    let tasks = state.tasks.lock().fetch_ordered()?;
    Ok(Json(tasks))
}

pub async fn get_one(State(state): State<AppState>, Path(id): Path<i64>) -> TaskResult<Json<Task>> {
    let task = state.tasks.lock().get(id)?.ok_or(TaskError::NotFound)?;
    Ok(Json(task))
}

pub async fn create(State(state): State<AppState>, payload: Result<Json<NewTask>, JsonRejection>) -> TaskResult<(StatusCode, Json<Task>)> {
    let Json(new_task) = payload.map_err(bad_request)?;
    let task = state.tasks.lock().insert(&new_task)?;

    tracing::info!(id = task.id, title = %task.title, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(State(state): State<AppState>, Path(id): Path<i64>, payload: Result<Json<TaskUpdate>, JsonRejection>) -> TaskResult<Json<Task>> {
    let Json(task_update) = payload.map_err(bad_request)?;
    let task = state.tasks.lock().update(id, &task_update)?;

    Ok(Json(task))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> TaskResult<StatusCode> {
    state.tasks.lock().delete(id)?;

    tracing::info!(id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_one(State(state): State<AppState>, Path(id): Path<i64>, payload: Result<Json<MoveRequest>, JsonRejection>) -> TaskResult<Json<Vec<Task>>> {
    let Json(request) = payload.map_err(bad_request)?;
    let tasks = state.tasks.lock().move_task(id, request.direction)?;

    Ok(Json(tasks))
}

pub async fn bulk_reorder(State(state): State<AppState>, payload: Result<Json<BulkReorderRequest>, JsonRejection>) -> TaskResult<Json<Vec<Task>>> {
    let Json(request) = payload.map_err(bad_request)?;
    let tasks = state.tasks.lock().bulk_reorder(&request.task_orders)?;

    Ok(Json(tasks))
}

fn bad_request(rejection: JsonRejection) -> TaskError {
    TaskError::InvalidInput(rejection.body_text())
}
