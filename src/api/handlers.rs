//! API handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::api::AppState;
use crate::types::{NewTodo, TodoId, TodoItem, TodoPatch};
use crate::Error;

/// Failure envelope: `{"ok": false, "error": "..."}`
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(Error::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let body = ErrorResponse {
            ok: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Liveness probe; never touches storage
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: state.service.clone(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub time: String,
}

/// Storage round-trip probe
pub async fn db_check(State(state): State<AppState>) -> ApiResult<DbResponse> {
    let db_time = state.store.db_time().await?;
    Ok(Json(DbResponse { ok: true, db_time }))
}

#[derive(Debug, Serialize)]
pub struct DbResponse {
    pub ok: bool,
    pub db_time: DateTime<Utc>,
}

/// List all todos
pub async fn list_todos(State(state): State<AppState>) -> ApiResult<ListResponse> {
    let todos = state.store.list().await?;
    Ok(Json(ListResponse { ok: true, todos }))
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub ok: bool,
    pub todos: Vec<TodoItem>,
}

/// Create a todo
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let Json(new) = payload?;
    let todo = state.store.create(new).await?;
    tracing::debug!(id = todo.id, "Created todo");
    Ok(Json(TodoResponse { ok: true, todo }))
}

/// Partially update a todo
pub async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let todo = state.store.update(id, patch).await?;
    Ok(Json(TodoResponse { ok: true, todo }))
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub ok: bool,
    pub todo: TodoItem,
}

/// Delete a todo; deleting a missing id reports zero rows
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
) -> ApiResult<DeleteResponse> {
    let Path(id) = id?;
    let deleted = state.store.delete(id).await?;
    Ok(Json(DeleteResponse { ok: true, deleted }))
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
    pub deleted: u64,
}
