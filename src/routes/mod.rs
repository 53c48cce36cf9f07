//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every admin endpoint lives under `/api/{gallery}` where `{gallery}` is
//! `photos` or `artworks`. The browser editor and the CLI are the only
//! clients; both speak JSON except for uploads, which send the raw file.

pub mod gallery;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// The full service router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/{gallery}/tiles", get(gallery::list_tiles))
        .route(
            "/api/{gallery}/tiles/upload",
            post(gallery::upload_tile).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/{gallery}/tiles/{id}", delete(gallery::delete_tile))
        .route("/api/{gallery}/tiles/{id}/metadata", patch(gallery::save_metadata))
        .route("/api/{gallery}/tiles/{id}/draft", patch(gallery::set_draft))
        .route("/api/{gallery}/tiles/{id}/forward", post(gallery::bring_forward))
        .route("/api/{gallery}/tiles/{id}/backward", post(gallery::send_backward))
        .route("/api/{gallery}/layout", put(gallery::save_layout))
        .route(
            "/api/{gallery}/revisions",
            get(gallery::list_revisions).post(gallery::create_revision),
        )
        .route("/api/{gallery}/revisions/{id}/restore", post(gallery::restore_revision))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
