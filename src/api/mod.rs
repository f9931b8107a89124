use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    NewTaskRequest, ReorderRequest, SetThemeRequest, Task, ThemeResponse, UpdateTaskRequest,
};
use crate::services::{TaskFilter, TaskSnapshot};
use crate::state::AppState;

#[derive(Deserialize)]
struct WatchParams {
    /// Last revision the subscriber has seen; 0 means "give me the current
    /// snapshot immediately".
    #[serde(default)]
    after: u64,
}

#[derive(Deserialize)]
struct ThemeParams {
    #[serde(rename = "userId")]
    user_id: String,
}

#[derive(Serialize)]
struct ClearCompletedResponse {
    deleted: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/watch", get(watch_tasks))
        .route("/tasks/reorder", post(reorder_tasks))
        .route("/tasks/clear-completed", post(clear_completed))
        .route("/tasks/{id}", patch(update_task).delete(delete_task))
        .route("/tasks/{id}/toggle", patch(toggle_task))
        .route("/preferences/theme", get(get_theme).put(set_theme))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = repository::fetch_tasks(&state.db).await?;
    Ok(Json(tasks))
}

/// Long-poll arm of the reactive query: returns as soon as a snapshot newer
/// than `after` exists, suspending until the next publish otherwise.
async fn watch_tasks(
    State(state): State<AppState>,
    Query(params): Query<WatchParams>,
) -> Result<Json<TaskSnapshot>, AppError> {
    let mut rx = state.tasks.subscribe();
    loop {
        {
            let snapshot = rx.borrow_and_update();
            if snapshot.revision > params.after {
                return Ok(Json(snapshot.clone()));
            }
        }
        rx.changed().await.map_err(|_| AppError::SubscriptionClosed)?;
    }
}

async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<NewTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = repository::insert_task(&state.db, req).await?;
    state.tasks.publish(&state.db).await?;
    Ok(Json(task))
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = repository::toggle_task(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    state.tasks.publish(&state.db).await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    repository::delete_task(&state.db, &id).await?;
    state.tasks.publish(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let task = repository::update_task_text(&state.db, &id, &req.text)
        .await?
        .ok_or(AppError::NotFound)?;
    state.tasks.publish(&state.db).await?;
    Ok(Json(task))
}

async fn reorder_tasks(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<StatusCode, AppError> {
    repository::update_tasks_order(&state.db, &req.tasks).await?;
    state.tasks.publish(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// One delete per completed task, each awaited before the next. A failure
/// partway leaves earlier deletes committed; every constituent delete is
/// idempotent, so the flow is safely re-runnable.
async fn clear_completed(
    State(state): State<AppState>,
) -> Result<Json<ClearCompletedResponse>, AppError> {
    let tasks = repository::fetch_tasks(&state.db).await?;
    let completed = TaskFilter::Completed.apply(&tasks);

    let mut deleted = 0;
    for task in &completed {
        repository::delete_task(&state.db, &task.id).await?;
        state.tasks.publish(&state.db).await?;
        deleted += 1;
    }

    debug!("cleared {} completed tasks", deleted);
    Ok(Json(ClearCompletedResponse { deleted }))
}

async fn get_theme(
    State(state): State<AppState>,
    Query(params): Query<ThemeParams>,
) -> Result<Json<ThemeResponse>, AppError> {
    let theme = repository::fetch_theme(&state.db, &params.user_id).await?;
    Ok(Json(ThemeResponse { theme }))
}

async fn set_theme(
    State(state): State<AppState>,
    Json(req): Json<SetThemeRequest>,
) -> Result<StatusCode, AppError> {
    repository::upsert_theme(&state.db, &req.user_id, req.theme).await?;
    Ok(StatusCode::NO_CONTENT)
}
