//! Request handlers, one module per resource.

pub mod assets;
pub mod media;
pub mod reviews;

use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use cinedex_types::Payload;
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": "cinedex",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Unwrap a JSON body that must be an object.
pub(crate) fn json_object(body: Result<Json<Value>, JsonRejection>) -> ServerResult<Payload> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(ServerError::BadRequest(
            "request body must be a JSON object".into(),
        )),
        Err(rejection) => Err(ServerError::BadRequest(rejection.body_text())),
    }
}
