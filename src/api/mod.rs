use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::FailureKind;
use crate::models::AggregateResult;
use crate::pipeline::AggregationPipeline;
use crate::saved::{NewSavedSearch, SavedSearch, SavedSearchStore};
use crate::scene::{self, Scene, SceneGenerator};
use crate::{SkycastError, VERSION};

/// Shared handles for every request
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AggregationPipeline>,
    pub saved_searches: Arc<dyn SavedSearchStore>,
    pub scene_generator: Option<Arc<dyn SceneGenerator>>,
}

#[derive(Deserialize)]
pub struct WeatherParams {
    pub location: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct WeatherResponse {
    pub result: AggregateResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
}

#[derive(Serialize, Deserialize)]
pub struct RenameRequest {
    pub label: String,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .route(
            "/saved-searches",
            get(list_saved_searches).post(create_saved_search),
        )
        .route(
            "/saved-searches/{id}",
            get(get_saved_search)
                .put(rename_saved_search)
                .delete(delete_saved_search),
        )
}

#[must_use]
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Validation => StatusCode::BAD_REQUEST,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        FailureKind::UpstreamError => StatusCode::BAD_GATEWAY,
    }
}

fn api_error(err: SkycastError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(err.kind());
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    (
        status,
        Json(ApiError {
            error: err.user_message(),
        }),
    )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": VERSION }))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> (StatusCode, Json<WeatherResponse>) {
    let result = match params.location.as_deref() {
        Some(location) => state.pipeline.aggregate(location).await,
        None => SkycastError::validation("Missing 'location' query parameter").into(),
    };

    let scene = match result.report() {
        Some(report) => {
            scene::decorate_with_scene(
                state.scene_generator.as_deref(),
                report,
                state.pipeline.config().scene.timeout(),
            )
            .await
        }
        None => None,
    };

    let status = result
        .failure_kind()
        .map_or(StatusCode::OK, status_for);

    (
        status,
        Json(WeatherResponse {
            result: result.into_user_facing(),
            scene,
        }),
    )
}

async fn list_saved_searches(State(state): State<AppState>) -> ApiResult<Json<Vec<SavedSearch>>> {
    let searches = state.saved_searches.list().await.map_err(api_error)?;
    Ok(Json(searches))
}

async fn create_saved_search(
    State(state): State<AppState>,
    Json(payload): Json<NewSavedSearch>,
) -> ApiResult<(StatusCode, Json<SavedSearch>)> {
    let saved = state
        .saved_searches
        .create(payload)
        .await
        .map_err(api_error)?;
    info!("Saved search {} '{}'", saved.id, saved.label);
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn get_saved_search(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<SavedSearch>> {
    state
        .saved_searches
        .get(id)
        .await
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| saved_search_not_found(id))
}

async fn rename_saved_search(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<RenameRequest>,
) -> ApiResult<Json<SavedSearch>> {
    state
        .saved_searches
        .rename(id, payload.label)
        .await
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| saved_search_not_found(id))
}

async fn delete_saved_search(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    if state.saved_searches.delete(id).await.map_err(api_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(saved_search_not_found(id))
    }
}

fn saved_search_not_found(id: u64) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: format!("Saved search {id} does not exist"),
        }),
    )
}
