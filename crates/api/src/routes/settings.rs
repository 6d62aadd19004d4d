use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Settings routes, with the body limit raised to fit a logo upload.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/settings-update",
        post(settings::update_settings).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
