use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use cinedex_store::RecordStore;
use cinedex_types::ReviewRecord;
use serde_json::{json, Value};

use super::json_object;
use crate::error::ServerResult;
use crate::state::AppState;

/// The media id in the path becomes the review's parent reference. It is
/// not checked against the media collection.
pub async fn create<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(media_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    let payload = json_object(body)?;
    let review = state.reviews.create(&media_id, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "_id": review.id }))))
}

pub async fn list<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(media_id): Path<String>,
) -> ServerResult<Json<Vec<ReviewRecord>>> {
    Ok(Json(state.reviews.list_for(&media_id).await?))
}

// Single-review routes address the review by its own id; the media id in
// the path is not consulted.

pub async fn get_one<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path((_media_id, review_id)): Path<(String, String)>,
) -> ServerResult<Json<ReviewRecord>> {
    Ok(Json(state.reviews.get(&review_id).await?))
}

pub async fn update<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path((_media_id, review_id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<ReviewRecord>> {
    let patch = json_object(body)?;
    Ok(Json(state.reviews.update(&review_id, patch).await?))
}

pub async fn delete<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path((_media_id, review_id)): Path<(String, String)>,
) -> ServerResult<StatusCode> {
    state.reviews.delete(&review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
