use axum::Json;
use axum::extract::Path;
use axum::routing::{post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let lecturers = Router::new()
        .route("/retrieveDaysToSet/{id}", get(retrieve_days_to_set))
        .route("/uploadSettedDates", put(upload_setted_dates))
        .route("/tasks", post(add_task))
        .route("/getTasksToDo/{id}", get(get_tasks_to_do))
        .route("/changeTaskVisibility/{task_id}", put(change_task_visibility));

    Router::new()
        .route("/health", get(health))
        .nest("/lecturers", lecturers)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn retrieve_days_to_set(
    State(state): State<AppState>,
    Path(lecturer_id): Path<i64>,
) -> Result<Json<PendingTasksToSet>, AppError> {
    let pending = state.lecturers.retrieve_dates_to_set(lecturer_id).await?;
    Ok(Json(pending))
}

async fn upload_setted_dates(
    State(state): State<AppState>,
    Json(req): Json<SettedDatesRequest>,
) -> Result<StatusCode, AppError> {
    state.lecturers.record_dates(req).await?;
    Ok(StatusCode::OK)
}

async fn add_task(
    State(state): State<AppState>,
    Json(req): Json<NewTaskRequest>,
) -> Result<StatusCode, AppError> {
    state.lecturers.create_task(req).await?;
    Ok(StatusCode::OK)
}

async fn get_tasks_to_do(
    State(state): State<AppState>,
    Path(lecturer_id): Path<i64>,
) -> Result<Json<TasksToDo>, AppError> {
    let tasks = state.lecturers.list_open_tasks(lecturer_id).await?;
    Ok(Json(tasks))
}

async fn change_task_visibility(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.lecturers.change_completion(task_id).await?;
    Ok(StatusCode::OK)
}
