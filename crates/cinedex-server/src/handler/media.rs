use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use cinedex_catalog::{validate_media_payload, CatalogError};
use cinedex_store::RecordStore;
use cinedex_types::MediaRecord;
use serde_json::{json, Value};

use super::json_object;
use crate::error::ServerResult;
use crate::state::AppState;

pub async fn create<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let payload = json_object(body)?;
    validate_media_payload(&payload).map_err(CatalogError::from)?;
    let media = state.media.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "imdbID": media.id }))))
}

pub async fn list<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
) -> ServerResult<Json<Vec<MediaRecord>>> {
    Ok(Json(state.media.list_all().await?))
}

pub async fn get_one<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ServerResult<Json<MediaRecord>> {
    Ok(Json(state.media.get(&id).await?))
}

pub async fn update<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<MediaRecord>> {
    let patch = json_object(body)?;
    Ok(Json(state.media.update(&id, patch).await?))
}

pub async fn delete<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.media.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
