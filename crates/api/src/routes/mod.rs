pub mod activity_logs;
pub mod health;
pub mod roles;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /settings-update                 update settings, multipart (POST)
/// /roles/{id}/default              make role the default (PATCH)
/// /activity-logs                   current user's activity log (GET)
/// ```
///
/// `max_upload_bytes` caps the settings-update body.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(settings::router(max_upload_bytes))
        .merge(roles::router())
        .merge(activity_logs::router())
}
