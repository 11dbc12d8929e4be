use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use taskpro_application::{NewTaskInput, TaskListQuery, TaskPatch};
use taskpro_domain::{TaskId, UserIdentity};

use crate::dto::{
    CreateTaskRequest, TaskListQueryParams, TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tasks_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<TaskListQueryParams>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let query = TaskListQuery::try_from(params)?;
    let tasks = state.task_service.list(&user, query).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

pub async fn create_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let input = NewTaskInput::try_from(payload)?;
    let task = state.task_service.create(&user, input).await?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

pub async fn get_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state
        .task_service
        .get(&user, task_id.parse::<TaskId>()?)
        .await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn update_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = task_id.parse::<TaskId>()?;
    let patch = TaskPatch::try_from(payload)?;
    let task = state.task_service.update(&user, task_id, patch).await?;

    Ok(Json(TaskResponse::from(task)))
}

pub async fn delete_task_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .task_service
        .delete(&user, task_id.parse::<TaskId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn task_stats_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<TaskStatsResponse>> {
    let stats = state.task_service.stats(&user).await?;
    Ok(Json(TaskStatsResponse::from(stats)))
}
