use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use cinedex_assets::{render_media_pdf, AssetError, PosterUpload};
use cinedex_store::RecordStore;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const POSTER_FIELD: &str = "poster";

/// Upload the image, then store its reference on the media record. An
/// unknown media id still answers 200; the upload is kept but nothing is
/// attached.
pub async fn upload_poster<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<Value>> {
    let mut multipart = multipart.map_err(|e| ServerError::BadRequest(e.body_text()))?;

    let upload = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?
            .ok_or_else(|| {
                ServerError::BadRequest(format!("multipart field `{POSTER_FIELD}` is required"))
            })?;
        if field.name() != Some(POSTER_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(POSTER_FIELD).to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;
        break PosterUpload {
            file_name,
            content_type,
            bytes,
        };
    };

    let reference = state.uploader.upload(upload).await?;
    state.media.attach_poster(&id, &reference).await?;
    Ok(Json(json!({ "message": "file uploaded" })))
}

/// One-page PDF for a media record. A poster that cannot be fetched is
/// left out rather than failing the request.
pub async fn media_pdf<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> ServerResult<Response> {
    let media = state.media.get(&id).await?;

    let poster = match &media.poster {
        Some(reference) => match state.fetcher.fetch(reference).await {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(id = %media.id, error = %err, "poster unavailable; rendering without it");
                None
            }
        },
        None => None,
    };

    let pdf = tokio::task::spawn_blocking(move || render_media_pdf(&media, poster.as_deref()))
        .await
        .map_err(|e| AssetError::Render(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=media.pdf"),
        ],
        pdf,
    )
        .into_response())
}
