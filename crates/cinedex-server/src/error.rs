use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cinedex_assets::AssetError;
use cinedex_catalog::CatalogError;
use cinedex_types::{MediaRecord, Record, ReviewRecord};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Malformed request: unreadable JSON, missing multipart field.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Catalog(CatalogError::ValidationFailed(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Catalog(CatalogError::NotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn not_found_message(collection: &str, id: &str) -> String {
    if collection == MediaRecord::COLLECTION {
        format!("Media with imdbID {id} is not found")
    } else if collection == ReviewRecord::COLLECTION {
        format!("Review with id {id} not found")
    } else {
        format!("Record {id} not found in {collection}")
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest(message) => json!({ "message": message }),
            Self::Catalog(CatalogError::NotFound { collection, id }) => {
                json!({ "message": not_found_message(collection, id) })
            }
            Self::Catalog(CatalogError::ValidationFailed(errors)) => json!({
                "message": "Errors during Media validation",
                "errorsList": errors,
            }),
            _ => {
                tracing::error!(error = %self, "request failed");
                json!({ "message": "Generic Server Error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
