use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use cinedex_store::RecordStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, assets, media, reviews};
use crate::state::AppState;

/// Every route the server answers, as `(method, path)`.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("POST", "/medias"),
    ("GET", "/medias"),
    ("GET", "/medias/:id"),
    ("PUT", "/medias/:id"),
    ("DELETE", "/medias/:id"),
    ("POST", "/medias/:id/poster"),
    ("GET", "/medias/:id/pdf"),
    ("POST", "/medias/:id/reviews"),
    ("GET", "/medias/:id/reviews"),
    ("GET", "/medias/:id/reviews/:review_id"),
    ("PUT", "/medias/:id/reviews/:review_id"),
    ("DELETE", "/medias/:id/reviews/:review_id"),
];

/// Build the axum router with all cinedex endpoints.
pub fn build_router<S: RecordStore + 'static>(state: AppState<S>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route("/medias", post(media::create::<S>).get(media::list::<S>))
        .route(
            "/medias/:id",
            get(media::get_one::<S>)
                .put(media::update::<S>)
                .delete(media::delete::<S>),
        )
        .route(
            "/medias/:id/poster",
            post(assets::upload_poster::<S>).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/medias/:id/pdf", get(assets::media_pdf::<S>))
        .route(
            "/medias/:id/reviews",
            post(reviews::create::<S>).get(reviews::list::<S>),
        )
        .route(
            "/medias/:id/reviews/:review_id",
            get(reviews::get_one::<S>)
                .put(reviews::update::<S>)
                .delete(reviews::delete::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
