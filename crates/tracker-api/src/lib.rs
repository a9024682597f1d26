pub mod config;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracker_core::{validate::validate_name, ErrorKind, Project, ProjectStore};

#[derive(Clone)]
pub struct AppState {
    store: Arc<ProjectStore>,
}

impl AppState {
    pub fn new(store: ProjectStore) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}

/// An error as the client sees it: a status code and `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<tracker_core::Error> for ApiError {
    fn from(err: tracker_core::Error) -> Self {
        let status = match err.kind() {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => {
                tracing::error!(error = ?err, "store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Run a store call off the async executor; file I/O is blocking.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&ProjectStore) -> tracker_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || f(&store)).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "store task failed");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: "internal error".to_string(),
            })
        }
    }
}

async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    let names = blocking(&state, |store| store.list()).await?;
    Ok(Json(names))
}

async fn get_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Project> {
    validate_name(&name)?;
    let project = blocking(&state, move |store| store.read(&name)).await?;
    Ok(Json(project))
}

async fn save_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<Project>, JsonRejection>,
) -> ApiResult<Value> {
    validate_name(&name)?;
    let Json(project) = body.map_err(|rejection| ApiError {
        status: StatusCode::BAD_REQUEST,
        detail: rejection.body_text(),
    })?;
    blocking(&state, move |store| store.write(&name, project)).await?;
    Ok(Json(json!({ "status": "saved" })))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Value> {
    validate_name(&name)?;
    blocking(&state, move |store| store.delete(&name)).await?;
    Ok(Json(json!({ "status": "deleted" })))
}

async fn project_schema() -> Json<Value> {
    Json(tracker_core::project_schema())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schema", get(project_schema))
        .route("/projects", get(list_projects))
        .route(
            "/projects/{name}",
            get(get_project).put(save_project).delete(delete_project),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
